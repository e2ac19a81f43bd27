//! Responses for Network service commands
use heapless::String;

use crate::command::{fields, Payload};
use crate::error::Error;

/// Operator selection +COPS
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OperatorSelection {
    pub mode: u8,
    pub operator: Option<String<32>>,
    /// 0: GSM, 7: LTE Cat-M, 9: LTE NB-IoT
    pub act: Option<u8>,
}

impl OperatorSelection {
    pub fn parse(payload: &Payload) -> Result<Self, Error> {
        let line = payload.line_with("+COPS:").ok_or(Error::Parse)?;
        let mut values = fields(line);

        let mode = values
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or(Error::Parse)?;
        let _format = values.next();
        let operator = values
            .next()
            .filter(|o| !o.is_empty())
            .map(|o| {
                let mut name = String::new();
                for c in o.chars() {
                    if name.push(c).is_err() {
                        break;
                    }
                }
                name
            });
        let act = values.next().and_then(|a| a.parse().ok());

        Ok(Self {
            mode,
            operator,
            act,
        })
    }

    /// The module reports an operator only while it is attached to one.
    pub fn is_registered(&self) -> bool {
        self.operator.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(lines: &[&str]) -> Payload {
        let mut p = Payload::default();
        for l in lines {
            p.push(l);
        }
        p
    }

    #[test]
    fn registered_operator() {
        let sel =
            OperatorSelection::parse(&payload(&["+COPS: 0,0,\"Twilio Super SIM\",7", "OK"]))
                .unwrap();
        assert_eq!(sel.mode, 0);
        assert_eq!(sel.operator.as_deref(), Some("Twilio Super SIM"));
        assert_eq!(sel.act, Some(7));
        assert!(sel.is_registered());
    }

    #[test]
    fn searching_has_no_operator() {
        let sel = OperatorSelection::parse(&payload(&["+COPS: 0", "OK"])).unwrap();
        assert!(!sel.is_registered());
        assert_eq!(OperatorSelection::parse(&payload(&["OK"])), Err(Error::Parse));
    }
}
