//! Small treebanks shared by the unit tests

use crate::store::Treebank;
use crate::token::{TokenId, TokenRecord};

/// Build a single-sentence treebank (sentence id 1) from `(id, head, relation)` rows
pub(crate) fn bank(rows: &[(TokenId, TokenId, &str)]) -> Treebank {
    Treebank::new(
        rows.iter()
            .map(|&(id, head, relation)| TokenRecord::new(id, 1, head, relation)),
    )
    .unwrap()
}

/// Sort a result for order-insensitive comparison
pub(crate) fn sorted(mut ids: Vec<TokenId>) -> Vec<TokenId> {
    ids.sort_unstable();
    ids
}

/// "Caesar misit legatos et obsides ad Ariovistum, et ... " style sentence
///
/// ```text
/// 1 misit      PRED    head 0
/// 2 Caesar     SBJ     head 1
/// 3 et         COORD   head 1
/// 4 legatos    OBJ_CO  head 3
/// 5 obsides    OBJ_CO  head 3
/// 6 ad         AuxP    head 1
/// 7 Ariovistum ADV     head 6
/// 8 multos     ATR     head 3   (shared by both coordinands)
/// 9 ,          AuxX    head 3
/// ```
pub(crate) fn coordination_bank() -> Treebank {
    let rows: &[(TokenId, TokenId, &str, &str)] = &[
        (1, 0, "PRED", "misit"),
        (2, 1, "SBJ", "Caesar"),
        (3, 1, "COORD", "et"),
        (4, 3, "OBJ_CO", "legatos"),
        (5, 3, "OBJ_CO", "obsides"),
        (6, 1, "AuxP", "ad"),
        (7, 6, "ADV", "Ariovistum"),
        (8, 3, "ATR", "multos"),
        (9, 3, "AuxX", ","),
    ];
    Treebank::new(rows.iter().map(|&(id, head, relation, form)| {
        TokenRecord::new(id, 1, head, relation).with_payload(form, form, "")
    }))
    .unwrap()
}

/// Three-way coordination built from two nested coordinators, with one
/// coordinand wrapped by a preposition:
///
/// ```text
/// 1  dedit   PRED    head 0
/// 2  aut     COORD   head 1
/// 3  et      COORD   head 2
/// 4  aurum   OBJ_CO  head 3
/// 5  argentum OBJ_CO head 3
/// 6  cum     AuxP    head 2
/// 7  equis   OBJ_CO  head 6
/// 8  multum  ATR     head 3   (modifies the inner coordination)
/// 9  heri    ADV     head 1
/// ```
pub(crate) fn nested_bank() -> Treebank {
    bank(&[
        (1, 0, "PRED"),
        (2, 1, "COORD"),
        (3, 2, "COORD"),
        (4, 3, "OBJ_CO"),
        (5, 3, "OBJ_CO"),
        (6, 2, "AuxP"),
        (7, 6, "OBJ_CO"),
        (8, 3, "ATR"),
        (9, 1, "ADV"),
    ])
}
