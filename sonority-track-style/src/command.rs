// Sonority
// Copyright (c) 2024 The Project Sonority Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::{debug, log_enabled, trace};

use sonority_core::support_track;

use sonority_core::errors::{malformed_error, not_found_error, not_implemented_error, shape_error};
use sonority_core::errors::{Error, Result};
use sonority_core::fourcc::codes;
use sonority_core::guid::{class, param, Guid};
use sonority_core::io::{BufReader, FiniteStream, ReadBytes};
use sonority_core::riff::{decode_versioned, get_first_chunk, skip_chunk, with_stream_capacity};
use sonority_core::riff::Record;
use sonority_core::track::{param_support, CommandParam, ParamSupport, ParamValue};
use sonority_core::track::{LoadContext, Track, TrackDescriptor};
use sonority_core::units::MusicTime;

/// A groove command.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Command {
    pub time: MusicTime,
    pub measure: u16,
    pub beat: u8,
    pub command: u8,
    pub groove_level: u8,
    pub groove_range: u8,
    pub repeat_mode: u8,
}

impl Record for Command {
    const SIZE: usize = 12;

    fn parse(reader: &mut BufReader<'_>) -> Result<Self> {
        let command = Command {
            time: reader.read_i32()?,
            measure: reader.read_u16()?,
            beat: reader.read_u8()?,
            command: reader.read_u8()?,
            groove_level: reader.read_u8()?,
            groove_range: reader.read_u8()?,
            repeat_mode: reader.read_u8()?,
        };
        // Padding.
        reader.read_u8()?;
        Ok(command)
    }
}

impl From<&Command> for CommandParam {
    fn from(cmd: &Command) -> Self {
        CommandParam {
            command: cmd.command,
            groove_level: cmd.groove_level,
            groove_range: cmd.groove_range,
            repeat_mode: cmd.repeat_mode,
        }
    }
}

/// A command track: a time-ordered list of groove commands.
#[derive(Default)]
pub struct CommandTrack {
    commands: Vec<Command>,
}

impl CommandTrack {
    /// Gets the commands of the track in stream order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}

impl Track for CommandTrack {
    fn new() -> Self {
        Default::default()
    }

    fn supported_tracks() -> &'static [TrackDescriptor] {
        &[support_track!(class::COMMAND_TRACK, "command", "Command Track")]
    }

    fn class_id(&self) -> Guid {
        class::COMMAND_TRACK
    }

    fn load(&mut self, reader: &mut dyn ReadBytes, _: &LoadContext<'_>) -> Result<()> {
        let chunk = get_first_chunk(reader)?;

        if chunk.id != codes::COMMAND_TRACK {
            return shape_error("command: expected a command track chunk");
        }

        let commands = {
            let mut scope = chunk.scoped(reader)?;

            if scope.bytes_available() < 4 {
                return malformed_error("command: missing record size");
            }

            let record_size = scope.read_u32()?;

            if record_size == 0 {
                return malformed_error("command: zero record size");
            }

            if record_size as usize != Command::SIZE {
                debug!("command: record size {} from another version", record_size);
            }

            let body = scope.bytes_available();

            if body % u64::from(record_size) != 0 {
                return malformed_error("command: trailing bytes after last command");
            }

            let count = body / u64::from(record_size);

            let mut commands = with_stream_capacity(count)?;

            for _ in 0..count {
                commands.push(decode_versioned::<Command, _>(&mut scope, record_size)?);
            }
            commands
        };

        skip_chunk(reader, &chunk)?;

        self.commands = commands;

        if log_enabled!(log::Level::Trace) {
            for (i, cmd) in self.commands.iter().enumerate() {
                trace!("command[{}]: {:?}", i, cmd);
            }
        }

        Ok(())
    }

    fn has_param(&self, kind: &Guid) -> Result<ParamSupport> {
        param_support(kind, &[param::COMMAND, param::COMMAND2, param::COMMAND_NEXT])
    }

    fn get_param(&self, kind: &Guid, time: MusicTime) -> Result<ParamValue> {
        match *kind {
            param::COMMAND => {
                let active = self
                    .commands
                    .iter()
                    .rev()
                    .find(|cmd| cmd.time <= time)
                    .or(self.commands.first());

                match active {
                    Some(cmd) => Ok(ParamValue::Command(cmd.into())),
                    None => not_found_error("command: track has no commands"),
                }
            }
            param::COMMAND2 => not_implemented_error("command: command2 parameter"),
            param::COMMAND_NEXT => not_implemented_error("command: next command parameter"),
            _ => Err(Error::GetUnsupported),
        }
    }

    fn set_param(&mut self, kind: &Guid, _: MusicTime, _: ParamValue) -> Result<()> {
        match *kind {
            param::COMMAND => not_implemented_error("command: setting the command parameter"),
            param::COMMAND_NEXT => not_implemented_error("command: setting the next command"),
            _ => Err(Error::SetUnsupported),
        }
    }
}

#[cfg(test)]
mod tests {
    use sonority_core::fourcc::FourCc;
    use sonority_core::io::{ReadOnlySource, SourceStream};
    use sonority_core::object::ObjectCache;
    use sonority_core::riff::{ChunkBuilder, Payload};
    use sonority_core::track::TrackObject;

    use super::*;

    fn command(payload: Payload, time: i32, cmd: u8, level: u8) -> Payload {
        payload.i32(time).u16(0).u8(0).u8(cmd).u8(level).u8(0).u8(0).u8(0)
    }

    fn load(data: &[u8]) -> (CommandTrack, Result<()>) {
        let cache = ObjectCache::new();
        let mut track = CommandTrack::new();
        let res = track.load(&mut BufReader::new(data), &LoadContext::new(&cache));
        (track, res)
    }

    #[test]
    fn verify_commands_in_order() {
        let mut payload = Payload::new().u32(12);
        payload = command(payload, 0, 1, 10);
        payload = command(payload, 768, 2, 20);
        payload = command(payload, 1536, 3, 30);

        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &payload.into_bytes());
        let data = builder.finish();

        let (track, res) = load(&data);
        res.unwrap();

        let levels: Vec<u8> = track.commands().iter().map(|c| c.groove_level).collect();
        assert_eq!(levels, [10, 20, 30]);

        match track.get_param(&param::COMMAND, 800) {
            Ok(ParamValue::Command(cmd)) => assert_eq!(cmd.command, 2),
            res => panic!("unexpected command parameter {:?}", res),
        }
    }

    #[test]
    fn verify_older_and_newer_record_sizes() {
        // An older, 8 byte layout stops after the command byte.
        let payload = Payload::new()
            .u32(8)
            .i32(96)
            .u16(1)
            .u8(2)
            .u8(5)
            .i32(192)
            .u16(1)
            .u8(3)
            .u8(6)
            .into_bytes();

        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &payload);
        let (track, res) = load(&builder.finish());
        res.unwrap();

        assert_eq!(track.commands().len(), 2);
        assert_eq!(track.commands()[1].time, 192);
        assert_eq!(track.commands()[1].command, 6);
        assert_eq!(track.commands()[1].groove_level, 0);

        // A newer, 16 byte layout carries trailing fields that are skipped.
        let mut payload = Payload::new().u32(16);
        payload = command(payload, 0, 1, 10).u32(0xdead_beef);
        payload = command(payload, 384, 4, 40).u32(0xdead_beef);

        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &payload.into_bytes());
        let (track, res) = load(&builder.finish());
        res.unwrap();

        assert_eq!(track.commands().len(), 2);
        assert_eq!(track.commands()[1].time, 384);
        assert_eq!(track.commands()[1].groove_level, 40);
    }

    #[test]
    fn verify_malformed_command_chunks() {
        // Trailing bytes after the last command.
        let payload = command(Payload::new().u32(12), 0, 1, 1).u16(0).into_bytes();
        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &payload);
        let (track, res) = load(&builder.finish());
        assert!(matches!(res, Err(Error::MalformedContainer(_))));
        assert!(track.commands().is_empty());

        // A zero record size.
        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &Payload::new().u32(0).u32(0).into_bytes());
        let (_, res) = load(&builder.finish());
        assert!(matches!(res, Err(Error::MalformedContainer(_))));

        // A wrong outer chunk.
        let mut builder = ChunkBuilder::new();
        builder.chunk(FourCc::new(*b"cmnt"), &Payload::new().u32(12).into_bytes());
        let (_, res) = load(&builder.finish());
        assert!(matches!(res, Err(Error::UnsupportedStreamShape(_))));
    }

    #[test]
    fn verify_truncation_at_every_offset() {
        let mut payload = Payload::new().u32(12);
        payload = command(payload, 0, 1, 10);
        payload = command(payload, 768, 2, 20);

        let mut builder = ChunkBuilder::new();
        builder.chunk(codes::COMMAND_TRACK, &payload.into_bytes());
        let data = builder.finish();

        for len in 0..data.len() {
            let cache = ObjectCache::new();
            let mut track = TrackObject::new(Box::new(CommandTrack::new()));

            let res = track.load(&mut BufReader::new(&data[..len]), &LoadContext::new(&cache));
            assert!(res.is_err());
            assert!(matches!(track.get_param(&param::COMMAND, 0), Err(Error::NotFound(_))));

            track.destroy();
        }
    }

    #[test]
    fn verify_huge_claimed_size_in_tiny_stream() {
        let size = 4 + 12 * 10_000_000u32;

        let mut data = Vec::new();
        data.extend_from_slice(b"cmnd");
        data.extend_from_slice(&size.to_le_bytes());
        data.extend_from_slice(&12u32.to_le_bytes());

        // A stream of known length rejects the chunk header.
        let (track, res) = load(&data);
        assert!(matches!(res, Err(Error::TruncatedStream(_))));
        assert!(track.commands().is_empty());

        // Otherwise the first missing command ends the load.
        let cache = ObjectCache::new();
        let mut track = CommandTrack::new();
        let source = ReadOnlySource::new(std::io::Cursor::new(data));
        let mut reader = SourceStream::new(Box::new(source));
        let res = track.load(&mut reader, &LoadContext::new(&cache));
        assert!(matches!(res, Err(Error::TruncatedStream(_))));
        assert!(track.commands().is_empty());
    }

    #[test]
    fn verify_params() {
        let mut track = TrackObject::new(Box::new(CommandTrack::new()));

        assert_eq!(track.has_param(&param::COMMAND2).unwrap(), ParamSupport::Supported);
        assert_eq!(track.has_param(&param::CHORD).unwrap(), ParamSupport::UnsupportedType);

        assert!(matches!(track.get_param(&param::COMMAND2, 0), Err(Error::NotImplemented(_))));

        let res = track.set_param(&param::COMMAND2, 0, ParamValue::None);
        assert!(matches!(res, Err(Error::SetUnsupported)));
        let res = track.set_param(&param::COMMAND_NEXT, 0, ParamValue::None);
        assert!(matches!(res, Err(Error::NotImplemented(_))));
    }
}
