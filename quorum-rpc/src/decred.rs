//! Commands of the `decred` record store plugin used by the inventory.

use quorum_core::{Comment, LikeEvent, RpcError, Token};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Plugin identifier.
pub const PLUGIN_ID: &str = "decred";

/// Fetch every comment of a proposal.
pub const CMD_GET_COMMENTS: &str = "getcomments";

/// Fetch every comment like event of a proposal.
pub const CMD_PROPOSAL_COMMENTS_LIKES: &str = "proposalcommentslikes";

/// A plugin command with a typed request and reply payload.
pub trait PluginRequest: Serialize {
    type Reply: DeserializeOwned;

    /// Command name, also used as the command id.
    const COMMAND: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetComments {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetCommentsReply {
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl PluginRequest for GetComments {
    type Reply = GetCommentsReply;
    const COMMAND: &'static str = CMD_GET_COMMENTS;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProposalCommentsLikes {
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetProposalCommentsLikesReply {
    #[serde(rename = "commentslikes", default)]
    pub comments_likes: Vec<LikeEvent>,
}

impl PluginRequest for GetProposalCommentsLikes {
    type Reply = GetProposalCommentsLikesReply;
    const COMMAND: &'static str = CMD_PROPOSAL_COMMENTS_LIKES;
}

/// Encode a command payload.
pub fn encode_payload<R: PluginRequest>(request: &R) -> Result<String, RpcError> {
    serde_json::to_string(request).map_err(|e| RpcError::Encode {
        reason: format!("{}: {}", R::COMMAND, e),
    })
}

/// Decode a verified reply payload.
pub fn decode_reply<R: PluginRequest>(payload: &str) -> Result<R::Reply, RpcError> {
    serde_json::from_str(payload).map_err(|e| RpcError::InvalidResponse {
        reason: format!("could not decode {} reply: {}", R::COMMAND, e),
    })
}
