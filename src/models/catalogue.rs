//! The universe of learnable items: an ordered list of keys per item type.
//! Used once to materialize default review records into an empty store.
use super::{ItemType, ReviewItem, Timestamp};

const LETTERS: [&str; 24] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa", "lambda",
    "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi", "psi",
    "omega",
];

const NOUN_PARADIGMS: [&str; 4] = ["1d-eta", "1d-alpha", "2d-masc", "2d-neut"];
const CASES: [&str; 5] = ["nom", "gen", "dat", "acc", "voc"];
const NUMBERS: [&str; 2] = ["s", "p"];

#[rustfmt::skip]
const VERB_ENDINGS: [&str; 50] = [
    "pres-act-ind-1s", "pres-act-ind-2s", "pres-act-ind-3s",
    "pres-act-ind-1p", "pres-act-ind-2p", "pres-act-ind-3p",
    "pres-mp-ind-1s", "pres-mp-ind-2s", "pres-mp-ind-3s",
    "pres-mp-ind-1p", "pres-mp-ind-2p", "pres-mp-ind-3p",
    "impf-act-ind-1s", "impf-act-ind-2s", "impf-act-ind-3s",
    "impf-act-ind-1p", "impf-act-ind-2p", "impf-act-ind-3p",
    "fut-act-ind-1s", "fut-act-ind-2s", "fut-act-ind-3s",
    "fut-act-ind-1p", "fut-act-ind-2p", "fut-act-ind-3p",
    "aor-act-ind-1s", "aor-act-ind-2s", "aor-act-ind-3s",
    "aor-act-ind-1p", "aor-act-ind-2p", "aor-act-ind-3p",
    "perf-act-ind-1s", "perf-act-ind-2s", "perf-act-ind-3s",
    "perf-act-ind-1p", "perf-act-ind-2p", "perf-act-ind-3p",
    "pres-act-subj-1s", "pres-act-subj-2s", "pres-act-subj-3s",
    "pres-act-subj-1p", "pres-act-subj-2p", "pres-act-subj-3p",
    "pres-act-imp-2s", "pres-act-imp-3s", "pres-act-imp-2p", "pres-act-imp-3p",
    "pres-act-inf",
    "pres-act-ptc-m-nom-s", "pres-act-ptc-f-nom-s", "pres-act-ptc-n-nom-s",
];

#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    entries: Vec<(ItemType, Vec<String>)>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Greek alphabet, first/second declension noun endings and common verb endings.
    pub fn greek() -> Self {
        let nouns = NOUN_PARADIGMS.iter().flat_map(|paradigm| {
            NUMBERS.iter().flat_map(move |number| {
                CASES
                    .iter()
                    .map(move |case| format!("{paradigm}-{case}-{number}"))
            })
        });

        Self::new()
            .with_items(ItemType::Letter, LETTERS)
            .with_items(ItemType::NounEnding, nouns)
            .with_items(ItemType::VerbEnding, VERB_ENDINGS)
    }

    /// Appends keys for `item_type`; ids are built as `<prefix>-<key>`.
    pub fn with_items<I, K>(mut self, item_type: ItemType, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = keys.into_iter().map(Into::into);
        match self.entries.iter_mut().find(|(t, _)| *t == item_type) {
            Some((_, existing)) => existing.extend(keys),
            None => self.entries.push((item_type, keys.collect())),
        }
        self
    }

    pub fn keys(&self, item_type: ItemType) -> &[String] {
        self.entries
            .iter()
            .find(|(t, _)| *t == item_type)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, keys)| keys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Default-state records for every catalogued item, all due at `now`.
    pub fn default_items(&self, now: Timestamp) -> Vec<ReviewItem> {
        self.entries
            .iter()
            .flat_map(|(item_type, keys)| {
                keys.iter()
                    .map(move |key| ReviewItem::new(item_type.item_id(key), *item_type, now))
            })
            .collect()
    }
}
