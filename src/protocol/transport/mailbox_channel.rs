//! Index of the mailbox channels exposed by the peer core.
use core::fmt;

/// One of the four mailbox channels. A plain value: opening the node it
/// names is left to the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MailboxChannel {
    Cm0 = 0,
    Cm1 = 1,
    Cm2 = 2,
    Cmn = 3,
}

impl MailboxChannel {
    pub const ALL: [MailboxChannel; 4] = [
        MailboxChannel::Cm0,
        MailboxChannel::Cm1,
        MailboxChannel::Cm2,
        MailboxChannel::Cmn,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Device node name.
    pub fn name(self) -> &'static str {
        match self {
            MailboxChannel::Cm0 => "axon_ipc_cm0",
            MailboxChannel::Cm1 => "axon_ipc_cm1",
            MailboxChannel::Cm2 => "axon_ipc_cm2",
            MailboxChannel::Cmn => "axon_ipc_cmn",
        }
    }
}

impl TryFrom<u8> for MailboxChannel {
    type Error = u8;

    /// Fails with the rejected index.
    fn try_from(index: u8) -> Result<Self, Self::Error> {
        MailboxChannel::ALL
            .get(index as usize)
            .copied()
            .ok_or(index)
    }
}

impl fmt::Display for MailboxChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
