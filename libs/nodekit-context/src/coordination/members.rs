use http::StatusCode;
use nodekit_http::{RestClient, RestClientError};
use serde::{Deserialize, Serialize};

const MEMBERS_PATH: &str = "/v2/members";

/// A coordination store cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "peerURLs", default)]
    pub peer_urls: Vec<String>,
    #[serde(rename = "clientURLs", default)]
    pub client_urls: Vec<String>,
}

#[derive(Deserialize)]
struct MemberList {
    #[serde(default)]
    members: Vec<Member>,
}

#[derive(Serialize)]
struct AddMember<'a> {
    #[serde(rename = "peerURLs")]
    peer_urls: &'a [String],
}

/// Member add/remove/list operations against the coordination store.
///
/// Only obtainable from a connected
/// [`CoordinationClient`](super::CoordinationClient) via `members()`.
#[derive(Debug, Clone)]
pub struct MembershipView {
    rest: RestClient,
}

impl MembershipView {
    pub(super) fn new(rest: RestClient) -> Self {
        Self { rest }
    }

    /// Base URL of the store this view talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    /// # Errors
    /// Returns [`RestClientError`] on transport failure or a non-`200` reply.
    pub async fn list(&self) -> Result<Vec<Member>, RestClientError> {
        let list: MemberList = self.rest.get_json(MEMBERS_PATH, StatusCode::OK).await?;
        Ok(list.members)
    }

    /// Announce a new member by its peer URLs.
    ///
    /// # Errors
    /// Returns [`RestClientError`] on transport failure or a non-`201` reply.
    pub async fn add(&self, peer_urls: &[String]) -> Result<Member, RestClientError> {
        let member: Member = self
            .rest
            .post_json(MEMBERS_PATH, &AddMember { peer_urls }, StatusCode::CREATED)
            .await?;
        tracing::info!(member_id = %member.id, ?peer_urls, "Added coordination store member");
        Ok(member)
    }

    /// # Errors
    /// Returns [`RestClientError`] on transport failure or a non-`204` reply,
    /// and [`RestClientError::InvalidUrl`] for an id that is not a non-empty
    /// hex string.
    pub async fn remove(&self, member_id: &str) -> Result<(), RestClientError> {
        // Member ids are hex strings
        if member_id.is_empty() || !member_id.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RestClientError::InvalidUrl {
                url: format!("{MEMBERS_PATH}/{member_id}"),
                reason: "invalid member id".to_owned(),
            });
        }
        self.rest
            .delete(&format!("{MEMBERS_PATH}/{member_id}"), StatusCode::NO_CONTENT)
            .await?;
        tracing::info!(member_id, "Removed coordination store member");
        Ok(())
    }
}
