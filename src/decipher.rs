//! Splits a transaction group into its main leg and balancing legs.

use crate::amount::Amount;
use crate::config::{ConverterConfig, Direction};
use crate::error::DecipherError;
use crate::record::Record;
use std::borrow::Cow;

/// A transaction group resolved into the leg posted to the main account and
/// the legs that offset it.
///
/// Legs are borrowed from the group; only a split reconstructed from the
/// main leg's split label is owned.
#[derive(Debug, Clone, PartialEq)]
pub struct Decipherment<'a> {
    pub main: &'a Record,
    pub splits: Vec<Cow<'a, Record>>,
}

/// Resolves one transaction group.
///
/// The first leg's kind decides the direction. Exactly one leg may carry the
/// main sign; legs of the opposite sign are the splits, in group order. With
/// no opposite legs, a single split is synthesized from the main leg's split
/// label. Splits must offset the main leg exactly.
pub fn decipher<'a>(
    group: &[&'a Record],
    config: &ConverterConfig,
) -> Result<Decipherment<'a>, DecipherError> {
    let Some(&first) = group.first() else {
        return Err(DecipherError::AmbiguousTransaction { candidates: 0 });
    };

    let direction =
        config
            .direction_of(&first.kind)
            .ok_or_else(|| DecipherError::UnsupportedType {
                kind: first.kind.clone(),
            })?;
    let (is_main, is_split): (fn(&Amount) -> bool, fn(&Amount) -> bool) = match direction {
        Direction::Outgoing => (Amount::is_negative, Amount::is_positive),
        Direction::Incoming => (Amount::is_positive, Amount::is_negative),
    };

    let candidates: Vec<&'a Record> = group
        .iter()
        .copied()
        .filter(|r| is_main(&r.amount))
        .collect();
    let &[main] = candidates.as_slice() else {
        return Err(DecipherError::AmbiguousTransaction {
            candidates: candidates.len(),
        });
    };

    let mut splits: Vec<Cow<'a, Record>> = group
        .iter()
        .copied()
        .filter(|r| is_split(&r.amount))
        .map(Cow::Borrowed)
        .collect();

    if splits.is_empty() {
        if main.split_label == config.unresolved_split_marker {
            return Err(DecipherError::UnresolvableSplit);
        }
        if main.split_label.is_empty() {
            return Err(DecipherError::MissingSplit);
        }
        splits.push(Cow::Owned(main.synthesize_split()));
    }

    let expected = -main.amount;
    let actual: Amount = splits.iter().map(|split| split.amount).sum();
    if expected != actual {
        return Err(DecipherError::Unbalanced { expected, actual });
    }

    Ok(Decipherment { main, splits })
}
