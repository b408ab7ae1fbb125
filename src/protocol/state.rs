//! Alternating-bit protocol state
//!
//! A single sequence bit is shared by every reliable handler on a link, so at
//! most one reliable exchange is ever in flight.

/// Which sequence bit the link expects next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArqState {
    /// Waiting for a frame with seq 0
    #[default]
    ExpectZero,
    /// Waiting for a frame with seq 1
    ExpectOne,
}

/// How an incoming reliable frame relates to the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The seq bit matches: process once, ack it and flip the state
    New,
    /// The seq bit does not match: the peer missed our last ack
    Retransmission,
}

/// What the dispatch loop must do with a reliable frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// New delivery or retransmission
    pub delivery: Delivery,
    /// Ack bit to write into the reply
    pub ack: u8,
    /// State after the reply is sent
    pub next: ArqState,
}

impl ArqState {
    /// The sequence bit a new delivery must carry
    pub fn expected_seq(self) -> u8 {
        match self {
            ArqState::ExpectZero => 0,
            ArqState::ExpectOne => 1,
        }
    }

    /// The bit acknowledged by the previous accepted exchange
    pub fn last_ack(self) -> u8 {
        self.expected_seq() ^ 1
    }

    /// The state after accepting a new delivery
    pub fn flipped(self) -> Self {
        match self {
            ArqState::ExpectZero => ArqState::ExpectOne,
            ArqState::ExpectOne => ArqState::ExpectZero,
        }
    }

    /// Classifies a frame by its sequence byte
    ///
    /// Any value other than the expected bit, including values outside `{0, 1}`,
    /// is a retransmission and re-acknowledges the previous exchange.
    pub fn step(self, seq: u8) -> Step {
        if seq == self.expected_seq() {
            Step {
                delivery: Delivery::New,
                ack: seq,
                next: self.flipped(),
            }
        } else {
            Step {
                delivery: Delivery::Retransmission,
                ack: self.last_ack(),
                next: self,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(ArqState::default(), ArqState::ExpectZero);
        assert_eq!(ArqState::default().expected_seq(), 0);
    }

    #[test]
    fn test_transition_table() {
        let step = ArqState::ExpectZero.step(0);
        assert_eq!(step.delivery, Delivery::New);
        assert_eq!(step.ack, 0);
        assert_eq!(step.next, ArqState::ExpectOne);

        let step = ArqState::ExpectZero.step(1);
        assert_eq!(step.delivery, Delivery::Retransmission);
        assert_eq!(step.ack, 1);
        assert_eq!(step.next, ArqState::ExpectZero);

        let step = ArqState::ExpectOne.step(1);
        assert_eq!(step.delivery, Delivery::New);
        assert_eq!(step.ack, 1);
        assert_eq!(step.next, ArqState::ExpectZero);

        let step = ArqState::ExpectOne.step(0);
        assert_eq!(step.delivery, Delivery::Retransmission);
        assert_eq!(step.ack, 0);
        assert_eq!(step.next, ArqState::ExpectOne);
    }

    #[test]
    fn test_out_of_range_seq_is_retransmission() {
        let step = ArqState::ExpectZero.step(7);
        assert_eq!(step.delivery, Delivery::Retransmission);
        assert_eq!(step.ack, 1);

        let step = ArqState::ExpectOne.step(0xFF);
        assert_eq!(step.delivery, Delivery::Retransmission);
        assert_eq!(step.ack, 0);
    }

    #[test]
    fn test_alternation() {
        let mut state = ArqState::default();
        for i in 0..10u8 {
            let step = state.step(i % 2);
            assert_eq!(step.delivery, Delivery::New);
            assert_eq!(step.ack, i % 2);
            state = step.next;
        }
        assert_eq!(state, ArqState::ExpectZero);
    }
}
