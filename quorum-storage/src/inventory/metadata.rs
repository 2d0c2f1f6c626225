//! Metadata stream decoding.
//!
//! A record carries its metadata as numbered streams. Each payload holds zero
//! or more concatenated JSON values. Streams are decoded independently: a
//! broken stream is logged and skipped without touching its siblings.

use quorum_core::{
    DecodeError, MetadataStream, ProposalMetadata, StartVote, StartVoteReply, StatusChange,
    Token, VoteAuthorization,
};
use serde::de::DeserializeOwned;

use super::InventoryEntry;

/// General proposal metadata.
pub const MD_STREAM_GENERAL: u64 = 0;

/// Status change history.
pub const MD_STREAM_CHANGES: u64 = 2;

/// Vote authorization.
pub const MD_STREAM_AUTHORIZE_VOTE: u64 = 13;

/// Vote configuration.
pub const MD_STREAM_VOTE_BITS: u64 = 14;

/// Vote snapshot taken when voting starts.
pub const MD_STREAM_VOTE_SNAPSHOT: u64 = 15;

/// Why a stream was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownStream,
    Decode(DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedStream {
    pub stream_id: u64,
    pub reason: SkipReason,
}

/// Outcome of loading one record's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Streams whose values were written into the entry.
    pub loaded: Vec<u64>,
    /// Streams that carried no value.
    pub empty: Vec<u64>,
    pub skipped: Vec<SkippedStream>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn record(&mut self, stream_id: u64, outcome: Result<bool, DecodeError>) {
        match outcome {
            Ok(true) => self.loaded.push(stream_id),
            Ok(false) => self.empty.push(stream_id),
            Err(e) => {
                tracing::error!(
                    stream_id,
                    token = %e.token,
                    error = %e.reason,
                    "Could not load metadata stream"
                );
                self.skipped.push(SkippedStream {
                    stream_id,
                    reason: SkipReason::Decode(e),
                });
            }
        }
    }
}

/// Decode every stream of `streams` into `entry`.
///
/// Change history is replaced only once a change stream decodes with at
/// least one value; otherwise the entry keeps what it had.
pub fn load_record_metadata(entry: &mut InventoryEntry, streams: &[MetadataStream]) -> LoadReport {
    let token = entry.record.token().clone();
    let mut report = LoadReport::default();
    let mut history: Option<Vec<StatusChange>> = None;

    for stream in streams {
        let outcome = match stream.id {
            MD_STREAM_GENERAL => decode_first::<ProposalMetadata>(&token, stream).map(|md| {
                md.map(|md| entry.proposal_metadata = md).is_some()
            }),
            MD_STREAM_CHANGES => decode_all::<StatusChange>(&token, stream).map(|changes| {
                let found = !changes.is_empty();
                if found {
                    history.get_or_insert_with(Vec::new).extend(changes);
                }
                found
            }),
            MD_STREAM_AUTHORIZE_VOTE => decode_first::<VoteAuthorization>(&token, stream)
                .map(|avr| avr.map(|avr| entry.vote_authorization = Some(avr)).is_some()),
            MD_STREAM_VOTE_BITS => decode_first::<StartVote>(&token, stream).map(|sv| {
                tracing::trace!(token = %token, "Loaded vote bits");
                sv.map(|sv| entry.vote_config = Some(sv)).is_some()
            }),
            MD_STREAM_VOTE_SNAPSHOT => decode_first::<StartVoteReply>(&token, stream)
                .map(|svr| svr.map(|svr| entry.vote_outcome = Some(svr)).is_some()),
            unknown => {
                tracing::error!(stream_id = unknown, token = %token, "Invalid metadata stream id");
                report.skipped.push(SkippedStream {
                    stream_id: unknown,
                    reason: SkipReason::UnknownStream,
                });
                continue;
            }
        };
        report.record(stream.id, outcome);
    }

    if let Some(changes) = history {
        entry.changes = changes;
    }
    report
}

/// Decode the first value of a single-value stream.
///
/// An empty payload yields `None`; trailing values are ignored.
fn decode_first<T: DeserializeOwned>(
    token: &Token,
    stream: &MetadataStream,
) -> Result<Option<T>, DecodeError> {
    serde_json::Deserializer::from_str(&stream.payload)
        .into_iter::<T>()
        .next()
        .transpose()
        .map_err(|e| decode_error(token, stream.id, e))
}

/// Decode every value of a multi-value stream, in encounter order.
///
/// Nothing is returned unless the whole payload decodes.
fn decode_all<T: DeserializeOwned>(
    token: &Token,
    stream: &MetadataStream,
) -> Result<Vec<T>, DecodeError> {
    serde_json::Deserializer::from_str(&stream.payload)
        .into_iter::<T>()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| decode_error(token, stream.id, e))
}

fn decode_error(token: &Token, stream_id: u64, e: serde_json::Error) -> DecodeError {
    DecodeError {
        stream_id,
        token: token.clone(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{CensorshipRecord, Record, RecordStatus};

    fn entry(token: &str) -> InventoryEntry {
        InventoryEntry::new(Record {
            status: RecordStatus::NotReviewed,
            timestamp: 1,
            censorship_record: CensorshipRecord {
                token: Token::from(token),
                ..Default::default()
            },
            version: "1".to_string(),
            metadata: Vec::new(),
        })
    }

    #[test]
    fn test_general_stream_sets_metadata() {
        let mut e = entry("t");
        let streams = vec![MetadataStream::new(
            MD_STREAM_GENERAL,
            r#"{"version":1,"timestamp":5,"name":"Prop","publickey":"pk","signature":"s"}"#,
        )];
        let report = load_record_metadata(&mut e, &streams);
        assert_eq!(report.loaded, vec![MD_STREAM_GENERAL]);
        assert_eq!(e.proposal_metadata.name, "Prop");
        assert_eq!(e.proposal_metadata.public_key, "pk");
    }

    #[test]
    fn test_changes_stream_appends_in_order() {
        let mut e = entry("t");
        let payload = concat!(
            r#"{"version":1,"adminpubkey":"a","newstatus":4,"timestamp":10}"#,
            "\n",
            r#"{"version":1,"adminpubkey":"a","newstatus":6,"timestamp":20}"#,
            "\n"
        );
        let report = load_record_metadata(&mut e, &[MetadataStream::new(MD_STREAM_CHANGES, payload)]);
        assert!(report.is_clean());
        assert_eq!(e.changes.len(), 2);
        assert_eq!(e.changes[0].new_status, RecordStatus::Public);
        assert_eq!(e.changes[1].new_status, RecordStatus::Archived);
    }

    #[test]
    fn test_empty_payload_is_not_an_error() {
        let mut e = entry("t");
        let streams = vec![
            MetadataStream::new(MD_STREAM_GENERAL, ""),
            MetadataStream::new(MD_STREAM_CHANGES, "  \n"),
            MetadataStream::new(MD_STREAM_AUTHORIZE_VOTE, ""),
        ];
        let report = load_record_metadata(&mut e, &streams);
        assert!(report.is_clean());
        assert!(report.loaded.is_empty());
        assert_eq!(report.empty.len(), 3);
        assert!(e.vote_authorization.is_none());
        assert!(e.changes.is_empty());
    }

    #[test]
    fn test_malformed_stream_does_not_block_siblings() {
        let mut e = entry("t");
        let streams = vec![
            MetadataStream::new(MD_STREAM_GENERAL, "{not json"),
            MetadataStream::new(
                MD_STREAM_AUTHORIZE_VOTE,
                r#"{"action":"authorize","recordversion":"1","receipt":"r","timestamp":3}"#,
            ),
            MetadataStream::new(99, "{}"),
        ];
        let report = load_record_metadata(&mut e, &streams);

        assert_eq!(report.loaded, vec![MD_STREAM_AUTHORIZE_VOTE]);
        assert_eq!(report.skipped.len(), 2);
        assert!(matches!(
            &report.skipped[0],
            SkippedStream { stream_id: MD_STREAM_GENERAL, reason: SkipReason::Decode(err) }
                if err.token.as_str() == "t"
        ));
        assert_eq!(
            report.skipped[1],
            SkippedStream {
                stream_id: 99,
                reason: SkipReason::UnknownStream
            }
        );
        assert_eq!(
            e.vote_authorization.as_ref().map(|a| a.action.as_str()),
            Some("authorize")
        );
    }

    #[test]
    fn test_partially_malformed_changes_are_not_applied() {
        let mut e = entry("t");
        let payload = concat!(
            r#"{"version":1,"newstatus":4,"timestamp":10}"#,
            "\n",
            r#"{"version":1,"newstatus":"#
        );
        let report = load_record_metadata(&mut e, &[MetadataStream::new(MD_STREAM_CHANGES, payload)]);
        assert_eq!(report.skipped.len(), 1);
        assert!(e.changes.is_empty());
    }

    #[test]
    fn test_single_value_stream_reads_first_value_only() {
        let mut e = entry("t");
        let payload = concat!(
            r#"{"version":1,"startblockheight":"100","endheight":"200"}"#,
            r#"{"version":2,"startblockheight":"300"}"#
        );
        load_record_metadata(&mut e, &[MetadataStream::new(MD_STREAM_VOTE_SNAPSHOT, payload)]);
        let outcome = e.vote_outcome.unwrap();
        assert_eq!(outcome.start_block_height, "100");
        assert_eq!(outcome.end_height, "200");
    }

    #[test]
    fn test_vote_bits_replace_wholesale() {
        let mut e = entry("t");
        load_record_metadata(
            &mut e,
            &[MetadataStream::new(MD_STREAM_VOTE_BITS, r#"{"version":1,"publickey":"old"}"#)],
        );
        load_record_metadata(
            &mut e,
            &[MetadataStream::new(MD_STREAM_VOTE_BITS, r#"{"version":2,"publickey":"new"}"#)],
        );
        let config = e.vote_config.unwrap();
        assert_eq!(config.version, 2);
        assert_eq!(config.public_key, "new");
    }
}
