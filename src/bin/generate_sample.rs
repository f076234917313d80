//! Writes `data.CSV`: a synthetic monthly fisheries trade report, encoded in
//! CP949 like the customs-service export it imitates.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEADERS: [&str; 6] = [
    "기준년월",
    "수출입구분명",
    "수산물수출입품목명",
    "국가명",
    "당월수출입중량(킬로그램)",
    "당월수출입미화금액(달러)",
];

/// (item, typical $/kg)
const ITEMS: [(&str, f64); 12] = [
    ("김", 38.0),
    ("참치", 6.5),
    ("굴", 9.0),
    ("전복", 32.0),
    ("오징어", 4.2),
    ("넙치", 11.0),
    ("연어", 12.5),
    ("새우", 8.8),
    ("명태", 2.1),
    ("고등어", 1.6),
    ("게", 15.0),
    ("미역", 3.4),
];

const COUNTRIES: [&str; 6] = ["중국", "일본", "미국", "베트남", "노르웨이", "러시아"];

fn main() -> Result<()> {
    env_logger::init();
    let out = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data.CSV"));

    let mut rng = StdRng::seed_from_u64(42);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    let mut rows = 0usize;
    for (item, price) in ITEMS {
        for direction in ["수출", "수입"] {
            for country in COUNTRIES {
                if rng.gen_bool(0.4) {
                    continue;
                }
                // a few zero-weight rows, as in the real data
                let weight: u64 = if rng.gen_bool(0.05) {
                    0
                } else {
                    rng.gen_range(50..200_000)
                };
                let amount = (weight as f64 * price * rng.gen_range(0.7..1.3)).round() as u64
                    + rng.gen_range(0..500);
                writer.write_record([
                    "202410".to_string(),
                    direction.to_string(),
                    item.to_string(),
                    country.to_string(),
                    weight.to_string(),
                    amount.to_string(),
                ])?;
                rows += 1;
            }
        }
    }

    let text = String::from_utf8(writer.into_inner().context("flushing CSV")?)?;
    let (bytes, _, had_errors) = encoding_rs::EUC_KR.encode(&text);
    anyhow::ensure!(!had_errors, "sample text is not representable in CP949");

    std::fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    log::info!("Wrote {rows} rows to {}", out.display());
    println!("Wrote {rows} rows to {}", out.display());
    Ok(())
}
