use lazy_static::lazy_static;
use tokgraph::table::{Row, RowBuilder, TokenTable};

use crate::convert::token_features_to_traversal;
use crate::traversal::TraversalSource;

lazy_static! {
    /// Features of "Item's for < $100 & change".
    pub static ref ITEM_TABLE: TokenTable = vec![
        ("Item", (0, 4), "item", "PROPN", "NNP", "nsubj", 1),
        ("'s", (4, 6), "'s", "AUX", "VBZ", "ROOT", 1),
        ("for", (7, 10), "for", "ADP", "IN", "prep", 1),
        ("<", (11, 12), "<", "X", "XX", "punct", 2),
        ("$", (13, 14), "$", "SYM", "$", "nmod", 5),
        ("100", (14, 17), "100", "NUM", "CD", "pobj", 2),
        ("&", (18, 19), "&", "CCONJ", "CC", "cc", 5),
        ("change", (20, 26), "change", "NOUN", "NN", "conj", 5),
    ]
    .into_iter()
    .map(|(text, (begin, end), lemma, pos, tag, dep, head)| {
        let row = RowBuilder::new()
            .str("text", text)
            .span("span", begin, end)
            .str("lemma", lemma)
            .str("pos", pos)
            .str("tag", tag)
            .str("dep", dep)
            .int("head", head);
        Row::from(row)
    })
    .collect();
}

pub fn item_source() -> TraversalSource {
    token_features_to_traversal(&ITEM_TABLE).unwrap()
}
