use anyhow::Result;
use igcorrect::annotate::AlignmentMatcher;
use igcorrect::shared::Species;
use igcorrect::{AlignmentParameters, Dna, Gene, GermlineDatabase};
use std::fs;
use std::path::Path;

// Pre-aligned record: an isolated low quality error at position 10, a
// cluster of somatic mutations around position 42 (one of them low quality)
#[allow(dead_code)]
pub const S: &str = "GAGGTGCAGCAGTTGGAGTCTGGGGGAGGCTTGGTACAGCTTAGAGGGTCCCTGAGACTC";
#[allow(dead_code)]
pub const G: &str = "GAGGTGCAGCTGTTGGAGTCTGGGGGAGGCTTGGTACAGCCTGGGGGGTCCCTGAGACTC";
#[allow(dead_code)]
pub const Q: &str = "IIIIIIIIII#IIIIIIIIIIIIIIIIIIIIIIIIIIIIIII#IIIIIIIIIIIIIIIII";
#[allow(dead_code)]
pub const S_CORRECTED: &str = "GAGGTGCAGCNGTTGGAGTCTGGGGGAGGCTTGGTACAGCTTAGAGGGTCCCTGAGACTC";

// Mouse IGHV9-4 read, its germline (gapped over the junction) and its
// quality. The bases at 285 and 286 are sequencing errors.
#[allow(dead_code)]
pub const IGHV9_4_READ: &str = "CAGATCCAGTTGGTGCAGTCTGGACCTGAGCTGAAGAAGCCTGGAGAGACAGTCAGGATCTCCTGCAAGGCTTCTGGGTATACCTTCACAACTGCTGGAATGCAGTGGGTGCAAAAGATGCCAGGAAAGGGTTTGAAGTGGATTGGCTGGATAAACACCCACTCTGGAGTGCCAAAATATGCAGAAGACTTCAAGGGACGGTTTGTCTTCTCTTTGGAAACCTCTGCCAGCACTGCATATTTACAGATAACGAACCTCAAAAATGAGGACACGGCTACATATTTCGTTGCGAGAGGAGGGGCCGCCTTCTATAGAAACGACGGGGGTGCTATGGACTCCTGGGGTCAAGGAACCTCAGTCACCGTCTCCTCAG";
#[allow(dead_code)]
pub const IGHV9_4_GERMLINE: &str = "CAGATCCAGTTGGTGCAGTCTGGACCTGAGCTGAAGAAGCCTGGAGAGACAGTCAGGATCTCCTGCAAGGCTTCTGGGTATACCTTCACAACTGCTGGAATGCAGTGGGTGCAAAAGATGCCAGGAAAGGGTTTGAAGTGGATTGGCTGGATAAACACCCACTCTGGAGTGCCAAAATATGCAGAAGACTTCAAGGGACGGTTTGCCTTCTCTTTGGAAACCTCTGCCAGCACTGCATATTTACAGATAAGCAACCTCAAAAATGAGGACACGGCTACGTATTTCTGTGCGAGA--------------------------------TGCTATGGACTACTGGGGTCAAGGAACCTCAGTCACCGTCTCCTCAG";
#[allow(dead_code)]
pub const IGHV9_4_PHRED: &str = ";=,,=;EE,<C,,8,CC,;;C-CEFGGGGGGGDFGGGGGGGGGGEGFGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG@FGGGGGGGGFFFFGDFFGGFCEGGGGGGGGGGGGGEEGGGGDFGGGEEFCFCFGGCFFFGGGGGGGGGGGGGGF66DGGGGGCFGGGDG5DGFGFDCDBF9BA8@FFFFFFDAFGFF@?B@33>8;@B4C?CCFFEECE27;;@;@@E333:@CFFF6;DF>(4:1<A#######@@@6C:A;4)7/)CEEFGFFCFGGC7?:9ECDEDGD6GGCFA,DDFF=8EGECC8FF=9,GGGFDGE@E;GGGGGGGGGGGFGGGG";
#[allow(dead_code)]
pub const IGHV9_4_CORRECTED: &str = "CAGATCCAGTTGGTGCAGTCTGGACCTGAGCTGAAGAAGCCTGGAGAGACAGTCAGGATCTCCTGCAAGGCTTCTGGGTATACCTTCACAACTGCTGGAATGCAGTGGGTGCAAAAGATGCCAGGAAAGGGTTTGAAGTGGATTGGCTGGATAAACACCCACTCTGGAGTGCCAAAATATGCAGAAGACTTCAAGGGACGGTTTGTCTTCTCTTTGGAAACCTCTGCCAGCACTGCATATTTACAGATAACGAACCTCAAAAATGAGGACACGGCTACATATTTCNNTGCGAGAGGAGGGGCCGCCTTCTATAGAAACGACGGGGGTGCTATGGACTCCTGGGGTCAAGGAACCTCAGTCACCGTCTCCTCAG";

pub const IGHV3_23: &str = "GAGGTGCAGCTGTTGGAGTCTGGGGGAGGCTTGGTACAGCCTGGGGGGTCCCTGAGACTCTCCTGTGCAGCCTCTGGATTCACCTTTAGCAGCTATGCCATGAGCTGGGTCCGCCAGGCTCCAGGGAAGGGGCTGGAGTGGGTCTCAGCTATTAGTGGTAGTGGTGGTAGCACATACTACGCAGACTCCGTGAAGGGCCGGTTCACCATCTCCAGAGACAATTCCAAGAACACGCTGTATCTGCAAATGAACAGCCTGAGAGCCGAGGACACGGCCGTATATTACTGTGCGAAAGA";
pub const IGHV3_23_ANCHOR: usize = 285;
pub const IGHD3_10: &str = "GTATTACTATGGTTCGGGGAGTTATTATAAC";
pub const IGHJ4: &str = "ACTACTTTGACTACTGGGGCCAAGGAACCCTGGTCACCGTCTCCTCAG";
pub const IGHJ4_ANCHOR: usize = 14;

// unrelated genes, they should never be called
const DECOY_V: &str = "TTTCCTCATGCAATTCAAAACCATGTCCGTAATGTAGGCGAAATAGTAAACCATTTTACGGAGGATACCAAATTCCTCCTTATTCAGGACCTAACCTGAGGTAAACCAGGTCTCTCCGCCCCCTTATAAAAGCTGTTGCACCTAGCCAAGTTCAACGGCAGCTGCAATGGAAATAGGCAATGACGGATATATATTAAAAAGTGTTTTAAGATACATTGAGGCCCGTTCGTGCTCCTCGCCCTGAAGCATTGCTTTGTGAAGAGGGACTTCAGCCAATAGACCTGCATACC";
const DECOY_J: &str = "GGCTCATTCTTCATGTGCAACCTAGGGAGAATGTGTACATACGCTCTTACT";
const DECOY_D: &str = "GCGGTCGCGTCTAATAA";
const MOUSE_V: &str = "TATACATTTGCTTCGTTGACTAGCAACCCAGGGCTATAGCTATTCCCCCCGCGGCCCACCCAGTATTCCTAACGGAGCATAAATCCCACCCGAACTAAGTTTGTCGAACCTTGGTCCAAGATCGGGACTCGGTCTCCAGGTAAGACGGGCTCATTCATAAACGTTACTAAGGGGTATAATCTTCTATTTGTGGGTGGGAACACTTAGTAGACTTGCAATCCAATTACAGCAGTCTTGTGCGCCTAGGGGCGCCCCAAAGGTAAACGAACCGTTGCGGTCAATCTTGTCGC";
const MOUSE_J: &str = "GGCTGATGAATTTGAAGCAGTGGCCGGGAGTGTGTGCTCAGGAGTTCG";

// read layout: prefix (10) | V (296) | junction (29, D at 3..24) | J (48) | tail (5)
pub const PREFIX: &str = "CAGGTGTCCA";
pub const JUNCTION: &str = "CCCGTATTACTATGGTTCGGGGAGCCCCG";
pub const TAIL: &str = "GTGAG";
#[allow(dead_code)]
pub const J_START: usize = 335;
#[allow(dead_code)]
pub const CDR3_AA: &str = "AKDPYYYGSGSPDYFDY";
#[allow(dead_code)]
pub const FULL_AA: &str = "EVQLLESGGGLVQPGGSLRLSCAASGFTFSSYAMSWVRQAPGKGLEWVSAISGSGGSTYYADSVKGRFTISRDNSKNTLYLQMNSLRAEDTAVYYCAKDPYYYGSGSPDYFDYWGQGTLVTVSS";

/// Productive IGHV3-23 / IGHD3-10 / IGHJ4 rearrangement
#[allow(dead_code)]
pub fn productive_read() -> String {
    format!("{}{}{}{}{}", PREFIX, IGHV3_23, JUNCTION, IGHJ4, TAIL)
}

/// Same read with one extra base in the junction (frameshift)
#[allow(dead_code)]
pub fn frameshift_read() -> String {
    format!("{}{}{}A{}{}", PREFIX, IGHV3_23, JUNCTION, IGHJ4, TAIL)
}

#[allow(dead_code)]
pub fn reverse_complement(seq: &str) -> String {
    Dna::from_string(seq).unwrap().reverse_complement().get_string()
}

#[allow(dead_code)]
pub fn high_quality(len: usize) -> String {
    "I".repeat(len)
}

#[allow(dead_code)]
pub fn database() -> Result<GermlineDatabase> {
    let gene = |name: &str, seq: &str, anchor: Option<usize>| {
        Gene::new(name.to_string(), anchor, "F".to_string(), Dna::from_string(seq)?)
    };
    Ok(GermlineDatabase::new(
        Species::Human,
        vec![
            gene("IGHV3-23*01", IGHV3_23, Some(IGHV3_23_ANCHOR))?,
            gene("IGHV1-2*02", DECOY_V, Some(279))?,
        ],
        vec![
            gene("IGHD3-10*01", IGHD3_10, None)?,
            gene("IGHD2-2*01", DECOY_D, None)?,
        ],
        vec![
            gene("IGHJ4*02", IGHJ4, Some(IGHJ4_ANCHOR))?,
            gene("IGHJ6*01", DECOY_J, Some(20))?,
        ],
    ))
}

#[allow(dead_code)]
pub fn matcher() -> Result<AlignmentMatcher> {
    AlignmentMatcher::new(database()?, AlignmentParameters::default())
}

/// Germline database on disk, in the layout `GermlineDatabase::load` reads
#[allow(dead_code)]
pub fn write_database(dir: &Path) -> Result<()> {
    let human = dir.join("human");
    fs::create_dir_all(&human)?;
    fs::write(
        human.join("V.fasta"),
        format!(
            ">X92218|IGHV3-23*01|Homo sapiens|F|V-REGION|\n{}\n>X07448|IGHV1-2*02|Homo sapiens|F|V-REGION|\n{}\n>TRBV1*01\n{}\n",
            IGHV3_23, DECOY_V, MOUSE_V
        ),
    )?;
    fs::write(
        human.join("D.fasta"),
        format!(">IGHD3-10*01\n{}\n>IGHD2-2*01\n{}\n", IGHD3_10, DECOY_D),
    )?;
    fs::write(
        human.join("J.fasta"),
        format!(
            ">J00256|IGHJ4*02|Homo sapiens|F|J-REGION|\n{}\n>IGHJ6*01\n{}\n",
            IGHJ4, DECOY_J
        ),
    )?;
    fs::write(
        human.join("V_gene_CDR3_anchors.csv"),
        format!("gene,anchor_index,function\nIGHV3-23*01,{},F\nIGHV1-2*02,279,F\n", IGHV3_23_ANCHOR),
    )?;
    fs::write(
        human.join("J_gene_CDR3_anchors.csv"),
        format!("gene,anchor_index,function\nIGHJ4*02,{},F\nIGHJ6*01,20,ORF\n", IGHJ4_ANCHOR),
    )?;

    let mouse = dir.join("mouse");
    fs::create_dir_all(&mouse)?;
    fs::write(mouse.join("V.fasta"), format!(">IGHV1-5*01\n{}\n", MOUSE_V))?;
    fs::write(mouse.join("J.fasta"), format!(">IGHJ1*01\n{}\n", MOUSE_J))?;
    Ok(())
}
