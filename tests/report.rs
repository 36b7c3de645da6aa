use gffstat::process_lines;

fn row(feature_type: &str, start: u64, end: u64, attrs: &str) -> String {
    format!(".\t.\t{feature_type}\t{start}\t{end}\t.\t.\t.\t{attrs}")
}

#[test]
fn boundary_long_non_coding_by_length() {
    let rows = vec![
        row("ncRNA_gene", 1, 201, "ID=g1"),
        row("lnc_RNA", 1, 201, "ID=t1;Parent=g1"),
        row("exon", 1, 201, "ID=e1;Parent=t1"),
    ];
    let (report, _) = process_lines(rows);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["long_non_coding_genes"]["count"], 1);
}

#[test]
fn boundary_long_non_coding_by_exon_count() {
    let rows = vec![
        row("ncRNA_gene", 1, 100, "ID=g1"),
        row("lnc_RNA", 1, 100, "ID=t1;Parent=g1"),
        row("exon", 1, 50, "ID=e1;Parent=t1"),
        row("exon", 51, 100, "ID=e2;Parent=t1"),
    ];
    let (report, _) = process_lines(rows);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["long_non_coding_genes"]["count"], 1);
}

#[test]
fn boundary_short_non_coding_at_two_hundred() {
    let rows = vec![
        row("ncRNA_gene", 1, 200, "ID=g1"),
        row("lnc_RNA", 1, 200, "ID=t1;Parent=g1"),
        row("exon", 1, 200, "ID=e1;Parent=t1"),
    ];
    let (report, _) = process_lines(rows);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["short_non_coding_genes"]["count"], 1);
}

#[test]
fn boundary_pseudogene_type_dominates_cds() {
    let rows = vec![
        row("pseudogene", 1, 500, "ID=g1"),
        row("pseudogenic_transcript", 1, 500, "ID=t1;Parent=g1"),
        row("CDS", 1, 500, "ID=c1;Parent=t1"),
    ];
    let (report, _) = process_lines(rows);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["pseudogenes"]["count"], 1);
    assert_eq!(json["coding_genes"], serde_json::json!({}));
}

#[test]
fn boundary_cds_without_exons_is_coding_without_intron() {
    let rows = vec![
        row("gene", 1, 500, "ID=g1"),
        row("mRNA", 1, 500, "ID=t1;Parent=g1"),
        row("CDS", 1, 500, "ID=c1;Parent=t1"),
    ];
    let (report, _) = process_lines(rows);
    let json = serde_json::to_value(&report).unwrap();
    let mrna = &json["coding_genes"]["transcripts"]["mRNA"];
    assert!(mrna["features"].get("intron").is_none());
    assert!(mrna["features"].get("cds").is_some());
}

#[test]
fn multi_parent_leaf_is_attributed_to_every_resolved_parent() {
    let rows = vec![
        row("gene", 1, 1000, "ID=g1"),
        row("mRNA", 1, 1000, "ID=t1;Parent=g1"),
        row("mRNA", 1, 1000, "ID=t2;Parent=g1"),
        row("exon", 1, 100, "ID=e1;Parent=t1,t2"),
    ];
    let (report, diagnostics) = process_lines(rows);
    assert_eq!(diagnostics.unresolved.count, 0);

    let json = serde_json::to_value(&report).unwrap();
    let mrna = &json["long_non_coding_genes"]["transcripts"]["mRNA"];
    assert_eq!(mrna["count"], 2);
    assert_eq!(mrna["features"]["exon"]["count"], 2);
}

#[test]
fn same_input_processed_twice_yields_equal_reports() {
    let rows = vec![
        row("gene", 1000, 2000, "ID=g1;biotype=protein_coding"),
        row("mRNA", 1000, 2000, "ID=t1;Parent=g1"),
        row("exon", 1000, 1200, "ID=e1;Parent=t1"),
        row("exon", 1500, 2000, "ID=e2;Parent=t1"),
        row("CDS", 1050, 1200, "ID=c1;Parent=t1"),
    ];
    let (first, _) = process_lines(rows.clone());
    let (second, _) = process_lines(rows);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn removing_skip_set_rows_leaves_the_report_unchanged() {
    let with_region = vec![
        row("region", 1, 1_000_000, "ID=r1"),
        row("gene", 1000, 2000, "ID=g1;biotype=protein_coding"),
        row("mRNA", 1000, 2000, "ID=t1;Parent=g1"),
        row("exon", 1000, 2000, "ID=e1;Parent=t1"),
    ];
    let without_region = vec![
        row("gene", 1000, 2000, "ID=g1;biotype=protein_coding"),
        row("mRNA", 1000, 2000, "ID=t1;Parent=g1"),
        row("exon", 1000, 2000, "ID=e1;Parent=t1"),
    ];
    let (a, _) = process_lines(with_region);
    let (b, _) = process_lines(without_region);
    assert_eq!(
        serde_json::to_value(&a).unwrap(),
        serde_json::to_value(&b).unwrap()
    );
}
