// Parser for the germline gene files
//
// A database directory holds one sub-directory per species:
//   <db>/human/V.fasta   (required)
//   <db>/human/J.fasta   (required)
//   <db>/human/D.fasta   (optional, heavy chains / beta chains)
//   <db>/human/V_gene_CDR3_anchors.csv, J_gene_CDR3_anchors.csv (optional)
// The fasta headers are either the gene name alone or IMGT headers
// ("accession|IGHV1-2*02|Homo sapiens|F|V-REGION|...").

use crate::shared::gene::{Gene, GeneType};
use crate::shared::options::{ReceptorType, Species};
use crate::shared::sequence::{Dna, GAP};
use anyhow::{anyhow, Context, Result};
use bio::io::fasta;
use csv::Reader;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

#[derive(Default, Clone, Debug)]
pub struct GermlineDatabase {
    pub species: Species,
    pub v_genes: Vec<Gene>,
    pub d_genes: Vec<Gene>,
    pub j_genes: Vec<Gene>,
}

impl GermlineDatabase {
    pub fn new(species: Species, v_genes: Vec<Gene>, d_genes: Vec<Gene>, j_genes: Vec<Gene>) -> Self {
        GermlineDatabase {
            species,
            v_genes,
            d_genes,
            j_genes,
        }
    }

    /// Load the genes of one species and keep the loci of one receptor type
    pub fn load(directory: &Path, species: Species, receptor: ReceptorType) -> Result<Self> {
        let dir = directory.join(species.name());
        if !dir.is_dir() {
            return Err(anyhow!(
                "No germline genes for {} (expected directory {:?})",
                species,
                dir
            ));
        }

        let mut v_genes = read_fasta_genes(open(&dir.join("V.fasta"))?, GeneType::V)?;
        let mut j_genes = read_fasta_genes(open(&dir.join("J.fasta"))?, GeneType::J)?;
        let d_path = dir.join("D.fasta");
        let d_genes = if d_path.is_file() {
            read_fasta_genes(open(&d_path)?, GeneType::D)?
        } else {
            Vec::new()
        };

        for (file, genes) in [
            ("V_gene_CDR3_anchors.csv", &mut v_genes),
            ("J_gene_CDR3_anchors.csv", &mut j_genes),
        ] {
            let path = dir.join(file);
            if path.is_file() {
                add_anchors_gene(genes, open(&path)?)
                    .with_context(|| format!("Invalid anchor file {:?}", path))?;
            } else {
                warn!("No anchor file {:?}, CDR3 will not be reported", path);
            }
        }

        let mut db = GermlineDatabase::new(species, v_genes, d_genes, j_genes);
        db.restrict(receptor);
        if db.v_genes.is_empty() || db.j_genes.is_empty() {
            return Err(anyhow!(
                "The germline database {:?} has no {:?} V or J gene",
                dir,
                receptor
            ));
        }
        debug!(
            "Loaded {} V, {} D and {} J genes for {}",
            db.v_genes.len(),
            db.d_genes.len(),
            db.j_genes.len(),
            species
        );
        Ok(db)
    }

    /// Keep only the loci of one receptor type (IG or TR)
    pub fn restrict(&mut self, receptor: ReceptorType) {
        let prefix = receptor.locus_prefix();
        for genes in [&mut self.v_genes, &mut self.d_genes, &mut self.j_genes] {
            genes.retain(|g| g.locus().starts_with(prefix));
        }
    }

    pub fn genes(&self, gene_type: GeneType) -> &[Gene] {
        match gene_type {
            GeneType::V => &self.v_genes,
            GeneType::D => &self.d_genes,
            GeneType::J => &self.j_genes,
        }
    }

    /// Total length of a gene library, used as search space for e-values
    pub fn library_length(&self, gene_type: GeneType) -> usize {
        self.genes(gene_type).iter().map(|g| g.seq.len()).sum()
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Unable to open {:?}", path))
}

/// Read the genes of a fasta file. Entries whose name is not an IMGT name
/// of the expected type are skipped.
pub fn read_fasta_genes<R: Read>(reader: R, gene_type: GeneType) -> Result<Vec<Gene>> {
    let mut genes = Vec::new();
    for result in fasta::Reader::new(reader).records() {
        let record = result.map_err(|e| anyhow!("Error reading the fasta record: {}", e))?;
        let header = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        let fields: Vec<&str> = header.split('|').collect();
        let (name, functional) = if fields.len() >= 4 {
            (fields[1].trim(), fields[3].trim())
        } else {
            (record.id(), "")
        };

        // IMGT gapped sequences use '.' for the alignment gaps
        let sequence: String = String::from_utf8_lossy(record.seq())
            .chars()
            .filter(|&c| c != '.' && c != GAP as char)
            .collect();
        let seq = Dna::from_string(&sequence)
            .with_context(|| format!("Invalid sequence for gene {}", name))?;

        match Gene::new(name.to_string(), None, functional.to_string(), seq) {
            Ok(gene) if gene.gene_type() == Some(gene_type) => genes.push(gene),
            Ok(_) => warn!("Gene {} is not a {} gene, skipped", name, gene_type),
            Err(e) => warn!("{}, skipped", e),
        }
    }
    Ok(genes)
}

/// Add the CDR3 anchors (and functionality) from a csv file with the
/// columns `gene,anchor_index,function`.
pub fn add_anchors_gene<R: Read>(genes: &mut [Gene], reader: R) -> Result<()> {
    let mut rdr = Reader::from_reader(reader);
    let mut anchors = HashMap::<String, usize>::new();
    let mut functions = HashMap::<String, String>::new();
    rdr.headers()
        .map_err(|_e| anyhow!("Error reading the anchor file headers"))?;
    for result in rdr.records() {
        let record = result.map_err(|e| anyhow!("Error reading the record {:?}", e))?;
        let gene_name = record
            .get(0)
            .ok_or(anyhow!("Missing gene name in the anchor file"))?;
        let anchor = record
            .get(1)
            .ok_or(anyhow!("Missing anchor for {}", gene_name))?;
        anchors.insert(
            gene_name.to_string(),
            usize::from_str(anchor.trim())
                .map_err(|e| anyhow!("Invalid anchor for {}: {:?}", gene_name, e))?,
        );
        if let Some(function) = record.get(2) {
            functions.insert(gene_name.to_string(), function.to_string());
        }
    }

    for g in genes.iter_mut() {
        match anchors.get(&g.name) {
            Some(&pos) if pos + 3 <= g.seq.len() => g.cdr3_pos = Some(pos),
            Some(&pos) => warn!("Anchor {} is outside gene {}, ignored", pos, g.name),
            None => debug!("{} not found in anchor file", g.name),
        }
        if let Some(function) = functions.get(&g.name) {
            g.set_functional(function.clone());
        }
    }
    Ok(())
}
