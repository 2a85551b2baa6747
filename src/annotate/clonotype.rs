//! Grouping of annotated reads into clonotypes (same V gene, same J gene,
//! same CDR3 translation).
use crate::annotate::report::AnnotationResult;
use crate::shared::sequence::UNKNOWN_AMINO_ACID;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClonotypeGroup {
    pub v_gene: String,
    pub j_gene: String,
    // CDR3 of the first read of the group
    pub cdr3_aa: String,
    pub count: usize,
}

/// Two CDR3s of the same length agree everywhere neither holds an unknown
/// amino acid.
///```
/// use igcorrect::annotate::clonotype::cdr3_equivalent;
///assert!(cdr3_equivalent("CARXW", "CARDW"));
///assert!(!cdr3_equivalent("CARDW", "CAREW"));
///assert!(!cdr3_equivalent("CARW", "CARDW"));
///```
pub fn cdr3_equivalent(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.bytes()
            .zip(b.bytes())
            .all(|(x, y)| x == y || x == UNKNOWN_AMINO_ACID || y == UNKNOWN_AMINO_ACID)
}

#[derive(Clone, Debug, Default)]
pub struct ClonotypeCollection {
    groups: Vec<ClonotypeGroup>,
    // (V, J, CDR3 length) -> groups
    index: HashMap<(String, String, usize), Vec<usize>>,
}

impl ClonotypeCollection {
    pub fn new() -> ClonotypeCollection {
        ClonotypeCollection::default()
    }

    /// Count a read in its clonotype. Only productive reads are counted,
    /// the return value tells whether the read was.
    pub fn add(&mut self, result: &AnnotationResult) -> bool {
        if result.productive != Some(true) {
            return false;
        }
        let (v, j, cdr3) = match (&result.v, &result.j, &result.cdr3_aa) {
            (Some(v), Some(j), Some(cdr3)) if !cdr3.is_empty() => (v, j, cdr3),
            _ => return false,
        };
        let key = (v.name.clone(), j.name.clone(), cdr3.len());
        let candidates = self.index.entry(key).or_default();
        // first compatible group wins
        if let Some(&idx) = candidates
            .iter()
            .find(|&&idx| cdr3_equivalent(&self.groups[idx].cdr3_aa, cdr3))
        {
            self.groups[idx].count += 1;
            return true;
        }
        candidates.push(self.groups.len());
        self.groups.push(ClonotypeGroup {
            v_gene: v.name.clone(),
            j_gene: j.name.clone(),
            cdr3_aa: cdr3.clone(),
            count: 1,
        });
        true
    }

    pub fn groups(&self) -> &[ClonotypeGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Largest groups first, ties in order of appearance
    pub fn sorted(&self) -> Vec<&ClonotypeGroup> {
        let mut groups: Vec<&ClonotypeGroup> = self.groups.iter().collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups
    }
}

/// Clonotypes of a set of annotated reads
pub fn group_clonotypes<'a>(results: impl IntoIterator<Item = &'a AnnotationResult>) -> ClonotypeCollection {
    let mut collection = ClonotypeCollection::new();
    for result in results {
        collection.add(result);
    }
    collection
}
