//! Status bits stored with every block-index record.
//!
//! The low three bits are a validity *level* (how far verification got),
//! everything above is independent flags. Only the have-data / have-undo
//! flags matter to the decoder itself, since they gate which file-position
//! fields are present in the record; the rest are kept addressable for
//! display and filtering.

use serde::{Deserialize, Serialize};

/// How far block verification had progressed when the record was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValidityLevel {
    Unknown,
    /// Reserved legacy level, never written by current clients.
    Reserved,
    /// Header parsed, in the header tree.
    Tree,
    /// Full block seen, merkle root and transaction structure checked.
    Transactions,
    /// Outputs of all predecessors known to not exceed inputs.
    Chain,
    /// Scripts and signatures verified.
    Scripts,
}

/// The status bitmask of a block-index record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockStatus(pub u64);

impl BlockStatus {
    /// Mask over the validity level in the low three bits.
    pub const VALIDITY_MASK: u64 = 0x07;
    /// Full block data is stored in a block file.
    pub const HAVE_DATA: u64 = 1 << 3;
    /// Undo data is stored in an undo file.
    pub const HAVE_UNDO: u64 = 1 << 4;
    /// Either kind of file data present.
    pub const HAVE_MASK: u64 = Self::HAVE_DATA | Self::HAVE_UNDO;
    /// The block itself failed verification.
    pub const FAILED_VALID: u64 = 1 << 5;
    /// A predecessor failed verification.
    pub const FAILED_CHILD: u64 = 1 << 6;
    pub const FAILED_MASK: u64 = Self::FAILED_VALID | Self::FAILED_CHILD;
    /// Witness data was downloaded for this block.
    pub const OPT_WITNESS: u64 = 1 << 7;
    /// Trusted under an assumed-valid snapshot, scripts not rechecked.
    pub const ASSUMED_VALID: u64 = 1 << 8;

    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn has_data(self) -> bool {
        self.0 & Self::HAVE_DATA != 0
    }

    pub const fn has_undo(self) -> bool {
        self.0 & Self::HAVE_UNDO != 0
    }

    /// True when the record carries any file-position fields at all.
    pub const fn has_file_info(self) -> bool {
        self.0 & Self::HAVE_MASK != 0
    }

    pub const fn failed(self) -> bool {
        self.0 & Self::FAILED_MASK != 0
    }

    pub const fn has_witness(self) -> bool {
        self.0 & Self::OPT_WITNESS != 0
    }

    pub const fn assumed_valid(self) -> bool {
        self.0 & Self::ASSUMED_VALID != 0
    }

    pub fn validity(self) -> ValidityLevel {
        match self.0 & Self::VALIDITY_MASK {
            0 => ValidityLevel::Unknown,
            1 => ValidityLevel::Reserved,
            2 => ValidityLevel::Tree,
            3 => ValidityLevel::Transactions,
            4 => ValidityLevel::Chain,
            // 5 is the defined level; 6 and 7 are unused encodings.
            _ => ValidityLevel::Scripts,
        }
    }

    /// Human-readable flag summary, e.g. `"scripts, have-data, have-undo"`.
    pub fn describe(self) -> String {
        let mut parts = vec![match self.validity() {
            ValidityLevel::Unknown => "unknown",
            ValidityLevel::Reserved => "reserved",
            ValidityLevel::Tree => "tree",
            ValidityLevel::Transactions => "transactions",
            ValidityLevel::Chain => "chain",
            ValidityLevel::Scripts => "scripts",
        }];
        if self.has_data() {
            parts.push("have-data");
        }
        if self.has_undo() {
            parts.push("have-undo");
        }
        if self.0 & Self::FAILED_VALID != 0 {
            parts.push("failed");
        }
        if self.0 & Self::FAILED_CHILD != 0 {
            parts.push("failed-parent");
        }
        if self.has_witness() {
            parts.push("witness");
        }
        if self.assumed_valid() {
            parts.push("assumed-valid");
        }
        parts.join(", ")
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_info_bits_gate_independently() {
        assert!(!BlockStatus::new(0).has_file_info());
        assert!(BlockStatus::new(BlockStatus::HAVE_DATA).has_file_info());
        assert!(BlockStatus::new(BlockStatus::HAVE_UNDO).has_file_info());
        assert!(BlockStatus::new(BlockStatus::HAVE_UNDO).has_undo());
        assert!(!BlockStatus::new(BlockStatus::HAVE_UNDO).has_data());
    }

    #[test]
    fn validity_is_a_level_not_a_flag() {
        assert_eq!(BlockStatus::new(3).validity(), ValidityLevel::Transactions);
        assert_eq!(BlockStatus::new(5).validity(), ValidityLevel::Scripts);
        // Upper flags do not disturb the level.
        let s = BlockStatus::new(5 | BlockStatus::HAVE_MASK | BlockStatus::OPT_WITNESS);
        assert_eq!(s.validity(), ValidityLevel::Scripts);
    }

    #[test]
    fn describe_lists_set_flags() {
        let s = BlockStatus::new(5 | BlockStatus::HAVE_DATA | BlockStatus::HAVE_UNDO);
        assert_eq!(s.describe(), "scripts, have-data, have-undo");
        assert_eq!(BlockStatus::default().describe(), "unknown");
    }
}
