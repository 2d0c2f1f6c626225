//! Filtered, cursor-paginated proposal listing.

use quorum_core::{ProposalRecord, ProposalState, QuorumResult, Token, UserId};
use std::collections::HashSet;

use super::Inventory;

/// Parameters of one proposal page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposalsRequest {
    /// Return proposals older than this token.
    pub after: Option<Token>,
    /// Return proposals newer than this token. Ignored when `after` is set.
    pub before: Option<Token>,
    /// Only proposals owned by this user.
    pub user_id: Option<UserId>,
    /// Visibility classes to include. Empty matches nothing.
    pub state_filter: HashSet<ProposalState>,
}

impl ProposalsRequest {
    pub fn new(states: impl IntoIterator<Item = ProposalState>) -> Self {
        Self {
            state_filter: states.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Vetted proposals only.
    pub fn vetted() -> Self {
        Self::new([ProposalState::Vetted])
    }

    /// Unvetted proposals only.
    pub fn unvetted() -> Self {
        Self::new([ProposalState::Unvetted])
    }

    pub fn after(mut self, token: impl Into<Token>) -> Self {
        self.after = Some(token.into());
        self
    }

    pub fn before(mut self, token: impl Into<Token>) -> Self {
        self.before = Some(token.into());
        self
    }

    pub fn for_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    fn matches(&self, proposal: &ProposalRecord) -> bool {
        if let Some(user_id) = &self.user_id {
            if proposal.user_id.as_ref() != Some(user_id) {
                return false;
            }
        }
        self.state_filter.contains(&proposal.state)
    }
}

/// Pick one page out of an unordered snapshot.
///
/// The snapshot is ordered oldest first (ties: greater token first) and
/// walked newest first. The page is returned newest first. A zero page size
/// yields an empty page.
pub fn select_page(
    mut proposals: Vec<ProposalRecord>,
    request: &ProposalsRequest,
    page_size: usize,
) -> Vec<ProposalRecord> {
    if page_size == 0 {
        return Vec::new();
    }

    proposals.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| b.token().cmp(a.token()))
    });

    let after = request.after.as_ref().filter(|t| !t.is_empty());
    let before = match after {
        Some(_) => None,
        None => request.before.as_ref().filter(|t| !t.is_empty()),
    };

    let mut page_started = after.is_none() && before.is_none();
    let mut before_idx = None;
    let mut page = Vec::new();

    for (i, proposal) in proposals.iter().enumerate().rev() {
        if !request.matches(proposal) {
            continue;
        }

        if page_started {
            page.push(proposal.clone());
            if page.len() >= page_size {
                break;
            }
        } else if let Some(after) = after {
            page_started = proposal.token() == after;
        } else if let Some(before) = before {
            if proposal.token() == before {
                before_idx = Some(i);
                break;
            }
        }
    }

    if let Some(idx) = before_idx {
        // Collect oldest to newest just past the cursor, then flip.
        for proposal in &proposals[idx + 1..] {
            if !request.matches(proposal) {
                continue;
            }
            page.push(proposal.clone());
            if page.len() >= page_size {
                break;
            }
        }
        page.reverse();
    }

    page
}

impl Inventory {
    /// One page of proposals matching `request`.
    ///
    /// Sorting and filtering run on a snapshot after the guard is released.
    pub fn list_proposals(&self, request: &ProposalsRequest) -> QuorumResult<Vec<ProposalRecord>> {
        let snapshot = self.get_all()?;
        Ok(select_page(snapshot, request, self.config().page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::{CensorshipRecord, ProposalStatus};

    fn proposal(token: &str, timestamp: i64, state: ProposalState, user: Option<&str>) -> ProposalRecord {
        let status = match state {
            ProposalState::Vetted => ProposalStatus::Public,
            ProposalState::Unvetted => ProposalStatus::NotReviewed,
            ProposalState::Invalid => ProposalStatus::Invalid,
        };
        ProposalRecord {
            name: token.to_string(),
            state,
            status,
            timestamp,
            user_id: user.map(str::to_string),
            username: None,
            public_key: String::new(),
            signature: String::new(),
            version: "1".to_string(),
            censorship_record: CensorshipRecord {
                token: Token::from(token),
                ..Default::default()
            },
            num_comments: 0,
            changes: Vec::new(),
            vote_authorization: None,
            vote_config: None,
            vote_outcome: None,
        }
    }

    /// A..E with ascending timestamps, so newest first is E, D, C, B, A.
    fn five() -> Vec<ProposalRecord> {
        ["A", "B", "C", "D", "E"]
            .iter()
            .enumerate()
            .map(|(i, t)| proposal(t, i as i64, ProposalState::Vetted, None))
            .collect()
    }

    fn tokens(page: &[ProposalRecord]) -> Vec<&str> {
        page.iter().map(|p| p.token().as_str()).collect()
    }

    #[test]
    fn test_first_page_is_newest_first() {
        let page = select_page(five(), &ProposalsRequest::vetted(), 3);
        assert_eq!(tokens(&page), vec!["E", "D", "C"]);
    }

    #[test]
    fn test_after_cursor() {
        let page = select_page(five(), &ProposalsRequest::vetted().after("C"), 2);
        assert_eq!(tokens(&page), vec!["B", "A"]);
    }

    #[test]
    fn test_before_cursor() {
        let page = select_page(five(), &ProposalsRequest::vetted().before("C"), 2);
        assert_eq!(tokens(&page), vec!["E", "D"]);
    }

    #[test]
    fn test_before_cursor_takes_nearest_newer() {
        let page = select_page(five(), &ProposalsRequest::vetted().before("A"), 2);
        assert_eq!(tokens(&page), vec!["C", "B"]);
    }

    #[test]
    fn test_after_wins_over_before() {
        let request = ProposalsRequest::vetted().after("D").before("B");
        let page = select_page(five(), &request, 10);
        assert_eq!(tokens(&page), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_unknown_cursor_yields_empty_page() {
        assert!(select_page(five(), &ProposalsRequest::vetted().after("Z"), 5).is_empty());
        assert!(select_page(five(), &ProposalsRequest::vetted().before("Z"), 5).is_empty());
    }

    #[test]
    fn test_cursor_outside_filter_yields_empty_page() {
        let mut all = five();
        all.push(proposal("U", 10, ProposalState::Unvetted, None));
        assert!(select_page(all, &ProposalsRequest::vetted().after("U"), 5).is_empty());
    }

    #[test]
    fn test_equal_timestamps_order_by_token() {
        let all = vec![
            proposal("a", 1, ProposalState::Vetted, None),
            proposal("b", 1, ProposalState::Vetted, None),
            proposal("c", 1, ProposalState::Vetted, None),
        ];
        // Ascending sort puts "c" first, so newest first is a, b, c.
        let page = select_page(all, &ProposalsRequest::vetted(), 5);
        assert_eq!(tokens(&page), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_state_and_user_filters() {
        let all = vec![
            proposal("v1", 1, ProposalState::Vetted, Some("u1")),
            proposal("v2", 2, ProposalState::Vetted, Some("u2")),
            proposal("n1", 3, ProposalState::Unvetted, Some("u1")),
            proposal("x1", 4, ProposalState::Invalid, Some("u1")),
        ];

        let page = select_page(all.clone(), &ProposalsRequest::vetted().for_user("u1"), 10);
        assert_eq!(tokens(&page), vec!["v1"]);

        let both = ProposalsRequest::new([ProposalState::Vetted, ProposalState::Unvetted]);
        let page = select_page(all.clone(), &both, 10);
        assert_eq!(tokens(&page), vec!["n1", "v2", "v1"]);

        assert!(select_page(all, &ProposalsRequest::default(), 10).is_empty());
    }

    #[test]
    fn test_empty_cursor_means_first_page() {
        let page = select_page(five(), &ProposalsRequest::vetted().after(""), 2);
        assert_eq!(tokens(&page), vec!["E", "D"]);
    }

    #[test]
    fn test_zero_page_size_yields_nothing() {
        assert!(select_page(five(), &ProposalsRequest::vetted(), 0).is_empty());
        assert!(select_page(five(), &ProposalsRequest::vetted().before("C"), 0).is_empty());
    }
}
