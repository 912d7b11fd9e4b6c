//! Basic example demonstrating tumor/normal pairing.
//!
//! This example shows how to:
//! 1. Provide a small cohort in memory
//! 2. Pair tumors with their matched normals
//! 3. Compute copy-number log-ratios
//! 4. Examine results

use paired_cn::prelude::*;

fn main() -> Result<()> {
    println!("=== Tumor/Normal Pairing Example ===\n");

    let provider = create_example_cohort();

    let outcomes = Pipeline::new()
        .name("pairing-example")
        .data_sets("^cn_")
        .log_base(2.0)
        .run(&provider)?;

    for outcome in outcomes {
        println!("Data set: {}", outcome.data_set);
        let output = match outcome.result {
            Ok(output) => output,
            Err(err) => {
                println!("  failed: {}\n", err);
                continue;
            }
        };

        println!("{}", output.pairing);
        for (record, display) in output.ratios.iter().zip(&output.display_names) {
            let values: Vec<String> = record.values.iter().map(|v| format!("{:.3}", v)).collect();
            println!("  {:<40} [{}]", display, values.join(", "));
        }
        if output.ratios.n_nonfinite() > 0 {
            println!("  {} non-finite loci", output.ratios.n_nonfinite());
        }
        println!();
    }

    Ok(())
}

fn create_example_cohort() -> InMemoryProvider {
    InMemoryProvider::new().with_data_set(
        "cn_example",
        vec![
            ("TCGA-02-0001-01C-01D-0182-01", Signal::raw(vec![400.0, 210.0, 95.0, 48.0])),
            ("TCGA-02-0001-10A-01D-0182-01", Signal::raw(vec![100.0, 100.0, 100.0, 100.0])),
            ("TCGA-02-0003-01A-01D-0184-01", Signal::raw(vec![150.0, 0.0, 110.0, 90.0])),
            ("TCGA-02-0003-01B-01D-0184-01", Signal::raw(vec![140.0, 10.0, 100.0, 80.0])),
            ("TCGA-02-0003-11A-01D-0184-01", Signal::raw(vec![100.0, 100.0, 100.0, 100.0])),
            ("TCGA-02-0007-01A-01D-0186-01", Signal::raw(vec![90.0, 95.0, 100.0, 105.0])),
        ],
    )
}
