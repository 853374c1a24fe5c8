use serde::{Deserialize, Serialize};

/// Contract log event as published on the event-log subject.
///
/// Any extra fields in the published record (block number, log index, ...)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingLogEvent {
    /// Emitting contract
    pub address: String,
    /// ABI-encoded non-indexed arguments, `0x`-prefixed hex
    pub data: String,
    /// topics[0] is the event signature hash, the rest are indexed arguments
    #[serde(default)]
    pub topics: Vec<String>,
    pub transaction_hash: String,
}

impl IncomingLogEvent {
    pub fn from_slice(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    pub fn topic(&self, index: usize) -> Option<&str> {
        self.topics.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_published_record() {
        let payload = br#"{
            "address": "0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852",
            "blockNumber": "0x12a05f2",
            "data": "0x00",
            "logIndex": "0x1",
            "topics": [
                "0xd78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822",
                "0x0000000000000000000000007a250d5630b4cf539739df2c5dacb4c659f2488d"
            ],
            "transactionHash": "0xabc"
        }"#;

        let event = IncomingLogEvent::from_slice(payload).unwrap();
        assert_eq!(event.address, "0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852");
        assert_eq!(event.transaction_hash, "0xabc");
        assert_eq!(event.topics.len(), 2);
        assert!(event.topic(0).unwrap().starts_with("0xd78ad95f"));
        assert_eq!(event.topic(2), None);
    }

    #[test]
    fn test_missing_topics_default_to_empty() {
        let payload = br#"{"address":"0x1","data":"0x","transactionHash":"0x2"}"#;
        let event = IncomingLogEvent::from_slice(payload).unwrap();
        assert!(event.topics.is_empty());
    }

    #[test]
    fn test_reject_non_json() {
        assert!(IncomingLogEvent::from_slice(b"not json").is_err());
        assert!(IncomingLogEvent::from_slice(br#"{"address":"0x1"}"#).is_err());
    }
}
