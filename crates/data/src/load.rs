use crate::schema::{MachineConfig, SymbolDef};
use anyhow::{bail, Context};
use reelcade_core::{SymbolTable, MAX_MATCH, MIN_MATCH};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub const SYMBOLS_FILE: &str = "symbols.json";
pub const MACHINE_FILE: &str = "machine.json";

#[derive(Debug)]
pub struct CatalogReport {
    pub table: SymbolTable,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub struct Assets {
    pub table: SymbolTable,
    pub config: MachineConfig,
    pub warnings: Vec<String>,
}

pub fn load_symbol_defs(path: &Path) -> anyhow::Result<Vec<SymbolDef>> {
    load_json(path)
}

pub fn load_symbol_table(path: &Path) -> anyhow::Result<CatalogReport> {
    let defs = load_symbol_defs(path)?;
    build_symbol_table(&defs).with_context(|| format!("catalog {}", path.display()))
}

/// Hard errors for data the engine cannot use; authoring slips that still
/// settle (pay tables that shrink, rare symbols paying less) come back as
/// warnings.
pub fn build_symbol_table(defs: &[SymbolDef]) -> anyhow::Result<CatalogReport> {
    for def in defs {
        for (count, ratio) in &def.pay {
            if !(MIN_MATCH..=MAX_MATCH).contains(count) {
                bail!(
                    "symbol {}: pay key {} outside {}..={}",
                    def.icon,
                    count,
                    MIN_MATCH,
                    MAX_MATCH
                );
            }
            if !ratio.is_finite() || *ratio < 0.0 {
                bail!("symbol {}: invalid ratio {} for {}-kind", def.icon, ratio, count);
            }
        }
    }
    let warnings = authoring_warnings(defs);
    for warning in &warnings {
        log::warn!("{warning}");
    }
    let table = SymbolTable::new(defs.iter().map(SymbolDef::to_symbol).collect())
        .context("build symbol table")?;
    Ok(CatalogReport { table, warnings })
}

pub fn authoring_warnings(defs: &[SymbolDef]) -> Vec<String> {
    let symbols: Vec<_> = defs.iter().map(SymbolDef::to_symbol).collect();
    let mut warnings = Vec::new();
    for symbol in &symbols {
        for count in MIN_MATCH..MAX_MATCH {
            let lower = symbol.pay.ratio(count);
            let upper = symbol.pay.ratio(count + 1);
            if upper < lower {
                warnings.push(format!(
                    "symbol {}: {}-kind pays {} but {}-kind pays {}",
                    symbol.id,
                    count + 1,
                    upper,
                    count,
                    lower
                ));
            }
        }
    }
    for rare in &symbols {
        for common in symbols.iter().filter(|other| other.weight > rare.weight) {
            for count in MIN_MATCH..=MAX_MATCH {
                let rare_ratio = rare.pay.ratio(count);
                let common_ratio = common.pay.ratio(count);
                if rare_ratio < common_ratio {
                    warnings.push(format!(
                        "symbol {} (weight {}) pays {} at {}-kind, less than {} (weight {}) at {}",
                        rare.id,
                        rare.weight,
                        rare_ratio,
                        count,
                        common.id,
                        common.weight,
                        common_ratio
                    ));
                }
            }
        }
    }
    warnings
}

pub fn load_machine_config(path: &Path) -> anyhow::Result<MachineConfig> {
    let config: MachineConfig = load_json(path)?;
    config
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(config)
}

/// Missing files fall back to the built-in catalog and default settings.
pub fn load_assets(dir: &Path) -> anyhow::Result<Assets> {
    let symbols_path = dir.join(SYMBOLS_FILE);
    let (table, warnings) = if symbols_path.exists() {
        let report = load_symbol_table(&symbols_path)?;
        (report.table, report.warnings)
    } else {
        log::info!(
            "{} not found, using built-in catalog",
            symbols_path.display()
        );
        (SymbolTable::classic(), Vec::new())
    };
    let machine_path = dir.join(MACHINE_FILE);
    let config = if machine_path.exists() {
        load_machine_config(&machine_path)?
    } else {
        MachineConfig::default()
    };
    Ok(Assets {
        table,
        config,
        warnings,
    })
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcade_core::classic_symbols;
    use std::collections::BTreeMap;

    fn def(icon: &str, weight: u32, pay: &[(u32, f64)]) -> SymbolDef {
        SymbolDef {
            icon: icon.to_string(),
            weight,
            pay: pay.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn classic_catalog_has_no_warnings() {
        let defs: Vec<SymbolDef> = classic_symbols().iter().map(SymbolDef::from).collect();
        assert!(authoring_warnings(&defs).is_empty());
        let report = build_symbol_table(&defs).expect("build");
        assert_eq!(report.table.len(), 7);
    }

    #[test]
    fn warns_on_shrinking_pay_table() {
        let defs = vec![def("a", 1, &[(2, 10.0), (3, 5.0), (4, 20.0), (5, 30.0)])];
        let warnings = authoring_warnings(&defs);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("3-kind pays 5"));
    }

    #[test]
    fn warns_when_rare_symbol_pays_less() {
        let defs = vec![
            def("rare", 1, &[(2, 1.0), (3, 50.0), (4, 60.0), (5, 70.0)]),
            def("common", 5, &[(2, 2.0), (3, 3.0), (4, 4.0), (5, 5.0)]),
        ];
        let warnings = authoring_warnings(&defs);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("rare (weight 1) pays 1 at 2-kind"));
        assert!(build_symbol_table(&defs).is_ok());
    }

    #[test]
    fn rejects_pay_key_out_of_range() {
        let defs = vec![def("a", 1, &[(6, 10.0)])];
        let err = build_symbol_table(&defs).expect_err("key 6 must fail");
        assert!(err.to_string().contains("outside 2..=5"));
    }

    #[test]
    fn rejects_negative_ratio() {
        let defs = vec![def("a", 1, &[(2, -1.0)])];
        assert!(build_symbol_table(&defs).is_err());
    }

    #[test]
    fn rejects_duplicate_icons() {
        let defs = vec![def("a", 1, &[(2, 1.0)]), def("a", 1, &[(2, 1.0)])];
        let err = build_symbol_table(&defs).expect_err("duplicate must fail");
        assert!(format!("{err:#}").contains("duplicate symbol"));
    }
}
