//! Array element pairing.
//!
//! Elements are paired by a computed key rather than by sequence alignment:
//! a plain O(n·m) key-equality scan. Arrays in change logs (attachments,
//! obligations, linked releases) are short, and their elements usually carry
//! a stable identity, so position shifts do not matter.

use chlog_types::Value;
use tracing::debug;

use crate::structural::INDEX_KEY;

/// The key an array element is matched by.
///
/// Keys only compare equal within the same variant: an identity-key match
/// and an `index` match are never equivalent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchKey<'a> {
    /// Object exposing the configured identity key.
    Identity(&'a Value),
    /// Object without the identity key but with an `index` field.
    Index(&'a Value),
    /// Scalar or null element, matched by value.
    Literal(&'a Value),
    /// Anything else, matched only by array position.
    Position(usize),
}

/// Compute the match key of `element`, found at `position` in its array.
pub fn match_key<'a>(element: &'a Value, position: usize, identity_key: &str) -> MatchKey<'a> {
    match element {
        Value::Obj(_) => {
            if let Some(id) = element.get(identity_key).filter(|v| !v.is_null()) {
                MatchKey::Identity(id)
            } else if let Some(index) = element.get(INDEX_KEY).filter(|v| !v.is_null()) {
                MatchKey::Index(index)
            } else {
                MatchKey::Position(position)
            }
        }
        Value::Arr(_) => MatchKey::Position(position),
        scalar => MatchKey::Literal(scalar),
    }
}

/// One row of a match plan.
///
/// Both sides present: the elements correspond and are diffed recursively.
/// One side only: the element was removed (old only) or added (new only).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchedPair {
    pub old: Option<usize>,
    pub new: Option<usize>,
}

/// The pairing of an old array's elements with a new array's.
///
/// Rows for old elements come first, in old order; rows for added elements
/// follow, in new order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchPlan {
    pub pairs: Vec<MatchedPair>,
}

impl MatchPlan {
    /// Pairs with both sides present.
    pub fn matched(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().filter_map(|p| Some((p.old?, p.new?)))
    }

    /// Old positions with no partner.
    pub fn removed(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs
            .iter()
            .filter(|p| p.new.is_none())
            .filter_map(|p| p.old)
    }

    /// New positions with no partner.
    pub fn added(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs
            .iter()
            .filter(|p| p.old.is_none())
            .filter_map(|p| p.new)
    }

    /// The new-side partner of old element `i`.
    pub fn partner_of_old(&self, i: usize) -> Option<usize> {
        self.pairs.iter().find(|p| p.old == Some(i)).and_then(|p| p.new)
    }

    /// The old-side partner of new element `j`.
    pub fn partner_of_new(&self, j: usize) -> Option<usize> {
        self.pairs.iter().find(|p| p.new == Some(j)).and_then(|p| p.old)
    }
}

/// Pair the elements of `old` with those of `new`.
///
/// Each element is matched at most once; the first unused candidate with an
/// equal key wins.
pub fn match_arrays(old: &[Value], new: &[Value], identity_key: &str) -> MatchPlan {
    let new_keys: Vec<MatchKey<'_>> = new
        .iter()
        .enumerate()
        .map(|(j, v)| match_key(v, j, identity_key))
        .collect();
    let mut taken = vec![false; new.len()];
    let mut pairs = Vec::with_capacity(old.len() + new.len());

    for (i, element) in old.iter().enumerate() {
        let key = match_key(element, i, identity_key);
        let partner = new_keys
            .iter()
            .enumerate()
            .find(|(j, candidate)| !taken[*j] && **candidate == key)
            .map(|(j, _)| j);
        if let Some(j) = partner {
            taken[j] = true;
        }
        pairs.push(MatchedPair {
            old: Some(i),
            new: partner,
        });
    }

    for (j, _) in taken.iter().enumerate().filter(|(_, t)| !**t) {
        pairs.push(MatchedPair {
            old: None,
            new: Some(j),
        });
    }

    let plan = MatchPlan { pairs };
    debug!(
        identity_key,
        old = old.len(),
        new = new.len(),
        matched = plan.matched().count(),
        "matched array elements"
    );
    plan
}
