//! Power-on initialization script

use crate::protocol::cmd;

/// One entry of an initialization script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitStep {
    /// Opcode sent as a command byte, then each parameter as a data byte
    Command {
        opcode: u8,
        params: &'static [u8],
    },
    /// Pause for the given number of milliseconds
    Delay(u32),
    /// End of script
    End,
}

const fn command(opcode: u8, params: &'static [u8]) -> InitStep {
    InitStep::Command { opcode, params }
}

/// Panel bring-up after hardware reset
///
/// Tuned for saturated color and low flicker. Leaves the panel in 16 bpp
/// BGR mode with the display on.
pub static INIT_SCRIPT: &[InitStep] = &[
    command(cmd::SLPOUT, &[]),
    InitStep::Delay(120),
    command(cmd::PWCTRB, &[0x00, 0xC3, 0x30]),
    command(cmd::PWONCTR, &[0x64, 0x03, 0x12, 0x81]),
    command(cmd::DTCTRA, &[0x85, 0x10, 0x79]),
    command(cmd::PWCTRA, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    command(cmd::PUMPCTR, &[0x20]),
    command(cmd::DTCTRB, &[0x00, 0x00]),
    command(cmd::PWCTR1, &[0x22]),
    command(cmd::PWCTR2, &[0x11]),
    command(cmd::VMCTR1, &[0x3D, 0x20]),
    command(cmd::VMCTR2, &[0xAA]),
    command(cmd::MADCTL, &[0x08]),
    command(cmd::PIXFMT, &[0x55]),
    command(cmd::FRMCTR1, &[0x00, 0x13]),
    command(cmd::DFUNCTR, &[0x0A, 0xA2]),
    command(cmd::IFCTL, &[0x01, 0x30]),
    command(cmd::GAMMA3EN, &[0x00]),
    command(cmd::GAMMASET, &[0x01]),
    command(
        cmd::GMCTRP1,
        &[
            0x0F, 0x3F, 0x2F, 0x0C, 0x10, 0x0A, 0x53, 0xD5, 0x40, 0x0A, 0x13, 0x03, 0x08, 0x03,
            0x00,
        ],
    ),
    command(
        cmd::GMCTRN1,
        &[
            0x00, 0x00, 0x10, 0x03, 0x0F, 0x05, 0x2C, 0xA2, 0x3F, 0x05, 0x0E, 0x0C, 0x37, 0x3C,
            0x0F,
        ],
    ),
    command(cmd::SLPOUT, &[]),
    InitStep::Delay(120),
    command(cmd::DISPON, &[]),
    InitStep::Delay(50),
    InitStep::End,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_terminated_once() {
        let ends = INIT_SCRIPT
            .iter()
            .filter(|s| matches!(s, InitStep::End))
            .count();
        assert_eq!(ends, 1);
        assert_eq!(INIT_SCRIPT.last(), Some(&InitStep::End));
    }

    #[test]
    fn test_script_shape() {
        let commands = INIT_SCRIPT
            .iter()
            .filter(|s| matches!(s, InitStep::Command { .. }))
            .count();
        let total_delay: u32 = INIT_SCRIPT
            .iter()
            .map(|s| match s {
                InitStep::Delay(ms) => *ms,
                _ => 0,
            })
            .sum();
        assert_eq!(commands, 22);
        assert_eq!(total_delay, 290);
    }
}
