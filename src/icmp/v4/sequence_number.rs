type SequenceNumberInnerType = u16;

/// ICMP echo sequence number. Wraps from `u16::MAX` back to zero.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SequenceNumber(SequenceNumberInnerType);

impl SequenceNumber {
    pub fn next(self) -> Self {
        SequenceNumber(self.0.wrapping_add(1))
    }
}

impl From<SequenceNumber> for SequenceNumberInnerType {
    fn from(value: SequenceNumber) -> Self {
        value.0
    }
}

impl From<SequenceNumberInnerType> for SequenceNumber {
    fn from(value: SequenceNumberInnerType) -> Self {
        SequenceNumber(value)
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sequence_number_is_one() {
        assert_eq!(SequenceNumber::from(1), SequenceNumber::default().next());
    }

    #[test]
    fn next_wraps_to_zero() {
        let wrapped = SequenceNumber::from(u16::MAX).next();
        assert_eq!(SequenceNumber::from(0), wrapped);
    }
}
