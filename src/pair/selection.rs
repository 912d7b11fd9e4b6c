//! Selection of the patients to pair.

use log::warn;
use std::collections::HashSet;
use std::fmt;

/// Callback choosing a subset of candidate identities.
pub type SelectFn = Box<dyn Fn(&[String]) -> Vec<String> + Send + Sync>;

/// How the pairing engine narrows the candidate identities.
///
/// Every variant yields its names in candidate order, whatever order an
/// allow list or callback lists them in.
#[derive(Default)]
pub enum Selection {
    /// Keep every candidate.
    #[default]
    All,
    /// Keep the candidates named in the list.
    AllowList(Vec<String>),
    /// Let a callback choose.
    Callback(SelectFn),
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "All"),
            Selection::AllowList(names) => f.debug_tuple("AllowList").field(names).finish(),
            Selection::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

impl Selection {
    pub fn callback<F>(select: F) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
    {
        Selection::Callback(Box::new(select))
    }

    /// Apply the selection to `candidates`.
    ///
    /// Names that are not candidates are dropped with a warning. The result
    /// follows candidate order and holds each name once.
    pub fn apply(&self, candidates: &[String]) -> Vec<String> {
        let chosen = match self {
            Selection::All => return candidates.to_vec(),
            Selection::AllowList(names) => names.clone(),
            Selection::Callback(select) => select(candidates),
        };

        let wanted: HashSet<&str> = chosen.iter().map(String::as_str).collect();
        for name in &chosen {
            if !candidates.contains(name) {
                warn!("Selected identity '{}' has no tumor-normal pair", name);
            }
        }
        let mut seen = HashSet::new();
        candidates
            .iter()
            .filter(|c| wanted.contains(c.as_str()) && seen.insert(c.as_str()))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<String> {
        vec!["P1".into(), "P2".into(), "P3".into()]
    }

    #[test]
    fn test_all_keeps_everything() {
        assert_eq!(Selection::default().apply(&candidates()), candidates());
    }

    #[test]
    fn test_allow_list() {
        let sel = Selection::AllowList(vec!["P3".into(), "P1".into(), "P9".into()]);
        assert_eq!(sel.apply(&candidates()), vec!["P1".to_string(), "P3".to_string()]);
    }

    #[test]
    fn test_callback_result_follows_candidate_order() {
        let sel = Selection::callback(|c| {
            let mut picked: Vec<String> = c.iter().rev().cloned().collect();
            picked.push("P3".into());
            picked.push("ghost".into());
            picked
        });
        assert_eq!(sel.apply(&candidates()), candidates());
        let allow = Selection::AllowList(vec!["P3".into(), "P2".into(), "P3".into()]);
        assert_eq!(allow.apply(&candidates()), vec!["P2".to_string(), "P3".to_string()]);
    }

    #[test]
    fn test_callback_may_choose_nothing() {
        let sel = Selection::callback(|_| Vec::new());
        assert!(sel.apply(&candidates()).is_empty());
        assert_eq!(format!("{:?}", sel), "Callback(..)");
    }
}
