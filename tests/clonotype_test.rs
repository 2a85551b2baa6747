use anyhow::Result;
use igcorrect::annotate::{group_clonotypes, GeneCall};
use igcorrect::AnnotationResult;

fn call(name: &str) -> Option<GeneCall> {
    Some(GeneCall {
        name: name.to_string(),
        identity: 100.,
        evalue: 1e-50,
    })
}

fn result(id: &str, v: &str, j: &str, cdr3: &str, productive: bool) -> AnnotationResult {
    AnnotationResult {
        id: id.to_string(),
        v: call(v),
        j: call(j),
        cdr3_aa: Some(cdr3.to_string()),
        productive: Some(productive),
        ..Default::default()
    }
}

#[test]
fn group_by_genes_and_cdr3() -> Result<()> {
    let results = vec![
        result("a", "IGHV3-23*01", "IGHJ4*02", "CARDYW", true),
        result("b", "IGHV3-23*01", "IGHJ4*02", "CARXYW", true),
        result("c", "IGHV3-23*01", "IGHJ4*02", "CAREYW", true),
        result("d", "IGHV1-2*02", "IGHJ4*02", "CARDYW", true),
        result("e", "IGHV3-23*01", "IGHJ6*01", "CARDYW", true),
        result("f", "IGHV3-23*01", "IGHJ4*02", "CARDW", true),
        result("g", "IGHV3-23*01", "IGHJ4*02", "CAREYW", true),
        result("h", "IGHV3-23*01", "IGHJ4*02", "CAREYW", true),
    ];
    let collection = group_clonotypes(&results);
    assert_eq!(collection.len(), 5);

    let sorted = collection.sorted();
    assert_eq!(sorted[0].cdr3_aa, "CAREYW");
    assert_eq!(sorted[0].count, 3);
    // the unknown residue joins the first group
    assert_eq!(sorted[1].cdr3_aa, "CARDYW");
    assert_eq!(sorted[1].v_gene, "IGHV3-23*01");
    assert_eq!(sorted[1].count, 2);
    assert_eq!(sorted.iter().map(|g| g.count).sum::<usize>(), results.len());
    Ok(())
}

#[test]
fn incomplete_reads_are_not_counted() -> Result<()> {
    let mut no_j = result("a", "IGHV3-23*01", "IGHJ4*02", "CARDYW", true);
    no_j.j = None;
    let mut empty_cdr3 = result("b", "IGHV3-23*01", "IGHJ4*02", "", true);
    empty_cdr3.cdr3_aa = Some(String::new());
    let results = vec![
        no_j,
        empty_cdr3,
        result("c", "IGHV3-23*01", "IGHJ4*02", "CARDYW", false),
        AnnotationResult::degraded("d"),
    ];
    let collection = group_clonotypes(&results);
    assert!(collection.is_empty());
    Ok(())
}
