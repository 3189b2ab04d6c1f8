use lazy_static::lazy_static;

use crate::table::{Row, RowBuilder, TokenTable};

fn token(
    id: i64,
    text: &str,
    span: (usize, usize),
    lemma: &str,
    pos: &str,
    tag: &str,
    dep: &str,
    head: i64,
) -> RowBuilder {
    RowBuilder::new()
        .int("id", id)
        .str("text", text)
        .span("span", span.0, span.1)
        .str("lemma", lemma)
        .str("pos", pos)
        .str("tag", tag)
        .str("dep", dep)
        .int("head", head)
}

lazy_static! {
    /// Features of "Item's for < $100 & change".
    pub static ref ITEM_TABLE: TokenTable = vec![
        token(0, "Item", (0, 4), "item", "PROPN", "NNP", "nsubj", 1),
        token(1, "'s", (4, 6), "'s", "AUX", "VBZ", "ROOT", 1),
        token(2, "for", (7, 10), "for", "ADP", "IN", "prep", 1),
        token(3, "<", (11, 12), "<", "X", "XX", "punct", 2),
        token(4, "$", (13, 14), "$", "SYM", "$", "nmod", 5),
        token(5, "100", (14, 17), "100", "NUM", "CD", "pobj", 2),
        token(6, "&", (18, 19), "&", "CCONJ", "CC", "cc", 5),
        token(7, "change", (20, 26), "change", "NOUN", "NN", "conj", 5),
    ]
    .into_iter()
    .map(Row::from)
    .collect();
}
