use std::fs::File;
use std::io::BufReader;

use lazy_static::lazy_static;
use tokgraph::table::{Row, RowBuilder, TokenTable};

use crate::io::{ReadTable, Reader};

lazy_static! {
    pub static ref TEST_TABLES: Vec<TokenTable> = {
        let mut tables = Vec::new();

        // Item's for < $100 & change
        let t1 = vec![
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
        tables.push(t1);

        let mut t2 = TokenTable::new();
        t2.push(
            RowBuilder::new()
                .str("text", "Deleuze")
                .str("tag", "NNP")
                .str("ent_type", "PERSON"),
        );
        t2.push(RowBuilder::new().str("text", "writes").str("tag", "VBZ"));
        tables.push(t2);

        tables
    };
}

pub fn read_tables(filename: &str) -> Vec<TokenTable> {
    Reader::new(BufReader::new(File::open(filename).unwrap()))
        .tables()
        .map(|t| t.unwrap())
        .collect()
}
