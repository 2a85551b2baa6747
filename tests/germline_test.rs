mod common;
use anyhow::Result;
use common::*;
use igcorrect::shared::gene::{get_imgt_representation, has_d_segment};
use igcorrect::shared::parser::{add_anchors_gene, read_fasta_genes};
use igcorrect::shared::{GeneType, ReceptorType, Species};
use igcorrect::{AlignedPair, AlignmentParameters, Dna, GermlineDatabase};
use std::io::Cursor;

#[test]
fn translation() -> Result<()> {
    let v = Dna::from_string(IGHV3_23)?;
    assert_eq!(
        v.translate_frame(0).to_string(),
        "EVQLLESGGGLVQPGGSLRLSCAASGFTFSSYAMSWVRQAPGKGLEWVSAISGSGGSTYYADSVKGRFTISRDNSKNTLYLQMNSLRAEDTAVYYCAK"
    );
    assert_eq!(Dna::from_string("tggNNNtaaC")?.translate_frame(0).to_string(), "WX*");
    assert_eq!(Dna::from_string("ACGTA")?.translate_frame(0).to_string(), "T");
    assert!(Dna::from_string("ACGUA").is_err());
    assert_eq!(
        Dna::from_string("AACGTN")?.reverse_complement().get_string(),
        "NACGTT"
    );
    Ok(())
}

#[test]
fn imgt_names() -> Result<()> {
    let imgt = get_imgt_representation("IGHV3-23*01")?;
    assert_eq!(imgt.chain, "IGH");
    assert_eq!(imgt.gene_type, "V");
    assert_eq!(imgt.gene_id.as_deref(), Some("3"));
    assert_eq!(imgt.gene_position.as_deref(), Some("23"));
    assert_eq!(imgt.allele_index, Some(1));

    let tcr = get_imgt_representation("TCRBJ2-7*02")?;
    assert_eq!(tcr.chain, "TRB");
    assert_eq!(tcr.gene_type, "J");
    assert!(get_imgt_representation("V1").is_err());
    assert!(has_d_segment("IGH"));
    assert!(!has_d_segment("IGK"));
    Ok(())
}

#[test]
fn read_fasta_and_anchors() -> Result<()> {
    let fasta = format!(
        ">X92218|IGHV3-23*01|Homo sapiens|F|V-REGION|\n{}\n>IGHJ4*02\nACTACT\n>notagene\nACGT\n",
        IGHV3_23.replace("GAGGTG", "GAG...GTG")
    );
    let mut genes = read_fasta_genes(Cursor::new(fasta), GeneType::V)?;
    assert_eq!(genes.len(), 1);
    assert_eq!(genes[0].name, "IGHV3-23*01");
    assert_eq!(genes[0].seq.get_string(), IGHV3_23);
    assert!(genes[0].is_functional());

    let anchors = format!(
        "gene,anchor_index,function\nIGHV3-23*01,{},P\nIGHV9-9*01,12,F\n",
        IGHV3_23_ANCHOR
    );
    add_anchors_gene(&mut genes, Cursor::new(anchors))?;
    assert_eq!(genes[0].cdr3_pos, Some(IGHV3_23_ANCHOR));
    assert!(!genes[0].is_functional());

    // an anchor past the end of the gene is ignored
    let mut genes = read_fasta_genes(Cursor::new(">IGHJ1*01\nACGTACGTACGT\n"), GeneType::J)?;
    add_anchors_gene(&mut genes, Cursor::new("gene,anchor_index,function\nIGHJ1*01,11,F\n"))?;
    assert_eq!(genes[0].cdr3_pos, None);
    Ok(())
}

#[test]
fn load_database() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write_database(dir.path())?;

    let db = GermlineDatabase::load(dir.path(), Species::Human, ReceptorType::Ig)?;
    assert_eq!(db.v_genes.len(), 2);
    assert_eq!(db.d_genes.len(), 2);
    assert_eq!(db.j_genes.len(), 2);
    assert_eq!(db.v_genes[0].cdr3_pos, Some(IGHV3_23_ANCHOR));
    assert_eq!(db.library_length(GeneType::J), IGHJ4.len() + 51);

    // only the TRBV gene is left, and there is no TR J gene
    assert!(GermlineDatabase::load(dir.path(), Species::Human, ReceptorType::Tcr).is_err());
    let mouse = GermlineDatabase::load(dir.path(), Species::Mouse, ReceptorType::Ig)?;
    assert!(mouse.d_genes.is_empty());
    assert_eq!(mouse.v_genes[0].cdr3_pos, None);
    Ok(())
}

#[test]
fn aligned_pair_from_unaligned_germline() -> Result<()> {
    let params = AlignmentParameters::default();
    // the read lost one germline base
    let germline = "GAGGTGCAGCTGTTGGAGTCTGGGGGAGG";
    let read = "GAGGTGCAGCTGTTGAGTCTGGGGGAGG";
    let pair = AlignedPair::resolve(read.as_bytes(), germline.as_bytes(), &params)?;
    assert_eq!(pair.ungapped_observed(), read.as_bytes());
    assert_eq!(pair.len(), germline.len());
    assert_eq!(pair.comparable_columns(), read.len());
    assert_eq!(pair.mismatches(), 0);
    assert_eq!(pair.projected_germline().len(), read.len());

    assert!(AlignedPair::new(b"ACG".to_vec(), b"AC".to_vec()).is_err());
    assert!(AlignedPair::resolve(b"ACGTACGT", b"----", &params).is_err());
    Ok(())
}
