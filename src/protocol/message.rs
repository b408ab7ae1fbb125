use serde::{Serialize, Deserialize};

use crate::core::{Error, Result};

/// Operations understood by the management handler
///
/// The opcode is the first payload byte of a frame sent to the management id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ManagementOp {
    /// Remove every registered handler
    Disconnect = 1,
    /// Re-register the ensured handlers
    AddEnsuredPackets = 2,
}

/// Status written into the first reply payload byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Status {
    Accepted = 1,
    RejectedGeneric = 2,
}

impl TryFrom<u8> for ManagementOp {
    type Error = Error;

    fn try_from(opcode: u8) -> Result<Self> {
        match opcode {
            1 => Ok(ManagementOp::Disconnect),
            2 => Ok(ManagementOp::AddEnsuredPackets),
            other => Err(Error::invalid_argument(format!(
                "Unknown management operation {}",
                other
            ))),
        }
    }
}

impl From<ManagementOp> for u8 {
    fn from(op: ManagementOp) -> u8 {
        op as u8
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> u8 {
        status as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_parsing() {
        assert_eq!(ManagementOp::try_from(1).unwrap(), ManagementOp::Disconnect);
        assert_eq!(ManagementOp::try_from(2).unwrap(), ManagementOp::AddEnsuredPackets);

        let err = ManagementOp::try_from(0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(ManagementOp::try_from(200).is_err());
    }

    #[test]
    fn test_wire_values() {
        assert_eq!(u8::from(ManagementOp::Disconnect), 1);
        assert_eq!(u8::from(Status::Accepted), 1);
        assert_eq!(u8::from(Status::RejectedGeneric), 2);
    }
}
