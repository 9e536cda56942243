use anyhow::{anyhow, Result};
use crate::sysex::{SYSEX_END, SYSEX_START};

pub struct Channel {}
impl Channel {
    pub const fn num(n: u8) -> u8 { n & 0x0f }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MidiMessage {
    ControlChange { channel: u8, control: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    /// A complete system exclusive message, `F0` and `F7` included.
    SysEx { data: Vec<u8> },
}

impl MidiMessage {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            MidiMessage::ControlChange { channel, control, value } =>
                [0xb0 | Channel::num(*channel), *control & 0x7f, *value & 0x7f].to_vec(),
            MidiMessage::ProgramChange { channel, program } =>
                [0xc0 | Channel::num(*channel), *program & 0x7f].to_vec(),
            MidiMessage::SysEx { data } => data.clone(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let Some(&status) = bytes.first() else {
            return Err(anyhow!("Zero-size MIDI message"));
        };
        if status == SYSEX_START {
            if bytes.last() != Some(&SYSEX_END) {
                return Err(anyhow!("Unterminated SysEx message"));
            }
            return Ok(MidiMessage::SysEx { data: bytes.to_vec() });
        }
        match (status & 0xf0, bytes.len()) {
            (0xb0, 3) => Ok(MidiMessage::ControlChange {
                channel: status & 0x0f, control: bytes[1], value: bytes[2]
            }),
            (0xc0, 2) => Ok(MidiMessage::ProgramChange {
                channel: status & 0x0f, program: bytes[1]
            }),
            _ => Err(anyhow!("Failed to parse MIDI message"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_change_bytes() {
        let msg = MidiMessage::ControlChange { channel: 3, control: 0x63, value: 0x81 };
        assert_eq!(msg.to_bytes(), vec![0xb3, 0x63, 0x01]);
        assert_eq!(MidiMessage::from_bytes(&[0xb3, 0x63, 0x01]).unwrap(),
                   MidiMessage::ControlChange { channel: 3, control: 0x63, value: 0x01 });
    }

    #[test]
    fn parses_sysex_and_program_change() {
        assert_eq!(MidiMessage::from_bytes(&[0xf0, 0x01, 0xf7]).unwrap(),
                   MidiMessage::SysEx { data: vec![0xf0, 0x01, 0xf7] });
        assert_eq!(MidiMessage::from_bytes(&[0xc1, 0x05]).unwrap(),
                   MidiMessage::ProgramChange { channel: 1, program: 5 });
    }

    #[test]
    fn rejects_garbage() {
        assert!(MidiMessage::from_bytes(&[]).is_err());
        assert!(MidiMessage::from_bytes(&[0xf0, 0x01]).is_err());
        assert!(MidiMessage::from_bytes(&[0x90, 0x40, 0x7f]).is_err());
        assert!(MidiMessage::from_bytes(&[0xb0, 0x40]).is_err());
    }
}
