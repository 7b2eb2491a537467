//! Source-to-output file naming convention.
//!
//! Each instrument position (channel) is identified by a letter `A`..`H` in
//! output names and by an index `0`..`7` in source names. Three source families
//! are recognized:
//! - `RX{n}.csv`: RX spectrum analyzer path loss
//! - `{n}.csv`: TX spectrum analyzer path loss
//! - `{nn}.csv` (`00`..`07`): TX power meter path loss

use std::fmt;

/// One of the eight instrument positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Channel {
    /// All channels in index order.
    pub const ALL: [Channel; 8] = [
        Channel::A,
        Channel::B,
        Channel::C,
        Channel::D,
        Channel::E,
        Channel::F,
        Channel::G,
        Channel::H,
    ];

    /// Channel for a source index `0..=7`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Zero-based index of this channel.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Letter used in output file names.
    pub fn letter(self) -> char {
        match self {
            Channel::A => 'A',
            Channel::B => 'B',
            Channel::C => 'C',
            Channel::D => 'D',
            Channel::E => 'E',
            Channel::F => 'F',
            Channel::G => 'G',
            Channel::H => 'H',
        }
    }

    /// One-based position used by the `*A{n}` output aliases.
    pub fn ordinal(self) -> usize {
        self.index() + 1
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Power meter source codes, looked up verbatim.
const POWER_METER_CODES: [(&str, Channel); 8] = [
    ("00", Channel::A),
    ("01", Channel::B),
    ("02", Channel::C),
    ("03", Channel::D),
    ("04", Channel::E),
    ("05", Channel::F),
    ("06", Channel::G),
    ("07", Channel::H),
];

/// Recognized source file families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `RX{n}.csv`
    RxSpectrum(Channel),
    /// `{n}.csv`
    TxSpectrum(Channel),
    /// `{nn}.csv`
    TxPowerMeter(Channel),
}

impl SourceKind {
    /// Classify a source file name.
    ///
    /// Only the part of the name before the first `.` is considered, so
    /// `RX3.csv` and `RX3.old.csv` both map to channel D.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.split('.').next().unwrap_or_default();

        if let Some(digits) = stem.strip_prefix("RX") {
            return single_digit_channel(digits).map(SourceKind::RxSpectrum);
        }

        match stem.len() {
            1 => single_digit_channel(stem).map(SourceKind::TxSpectrum),
            2 => POWER_METER_CODES
                .iter()
                .find(|(code, _)| *code == stem)
                .map(|&(_, channel)| SourceKind::TxPowerMeter(channel)),
            _ => None,
        }
    }

    /// The channel this source calibrates.
    pub fn channel(self) -> Channel {
        match self {
            SourceKind::RxSpectrum(c) | SourceKind::TxSpectrum(c) | SourceKind::TxPowerMeter(c) => c,
        }
    }

    /// Output file names, in write order.
    pub fn output_names(self) -> Vec<String> {
        match self {
            SourceKind::RxSpectrum(c) => vec![
                format!("SG1_RX{}.txt", c),
                format!("SG2_RX{}.txt", c),
                format!("SG1_RXA{}.txt", c.ordinal()),
                format!("SG2_RXA{}.txt", c.ordinal()),
            ],
            SourceKind::TxSpectrum(c) => vec![
                format!("TX{}_NF_SPEC.txt", c),
                format!("TXA{}_NF_SPEC.txt", c.ordinal()),
            ],
            SourceKind::TxPowerMeter(c) => vec![format!("TX{}_NF_OSC.txt", c)],
        }
    }
}

fn single_digit_channel(digits: &str) -> Option<Channel> {
    match digits.as_bytes() {
        [d @ b'0'..=b'7'] => Channel::from_index(usize::from(d - b'0')),
        _ => None,
    }
}

/// Output file names for a source file, or an empty list if the name does
/// not follow the convention.
pub fn output_names(file_name: &str) -> Vec<String> {
    SourceKind::from_file_name(file_name)
        .map(SourceKind::output_names)
        .unwrap_or_default()
}

/// Name of the `SG2_` twin written alongside an `SG1_` output.
pub fn sg2_sibling(file_name: &str) -> Option<String> {
    file_name
        .strip_prefix("SG1_")
        .map(|rest| format!("SG2_{}", rest))
}
