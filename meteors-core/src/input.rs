/// Discrete per-frame input flags, sampled once per simulation step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub quit: bool,
}

/// Valid bits of the compact byte encoding used by scripted input streams.
pub const INPUT_MASK: u8 = 0x3F;

#[inline]
pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.left { 0x01 } else { 0 })
        | (if input.right { 0x02 } else { 0 })
        | (if input.up { 0x04 } else { 0 })
        | (if input.down { 0x08 } else { 0 })
        | (if input.fire { 0x10 } else { 0 })
        | (if input.quit { 0x20 } else { 0 })
}

#[inline]
pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        left: (byte & 0x01) != 0,
        right: (byte & 0x02) != 0,
        up: (byte & 0x04) != 0,
        down: (byte & 0x08) != 0,
        fire: (byte & 0x10) != 0,
        quit: (byte & 0x20) != 0,
    }
}
