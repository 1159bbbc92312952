//! Batch pipeline: report CSVs into derived shapefiles.
//!
//! Stages, in order:
//! 1. **Load**: read the base county shapefile once into the cache.
//! 2. **Discover**: enumerate report CSVs in the source directory.
//! 3. **Per report**: parse → merge → write `.shp`/`.shx`/`.dbf` → copy the
//!    `.prj` sidecar.
//!
//! Per-file anomalies (empty report, a value that will not fit its field)
//! are logged and absorbed so one bad report never aborts the batch. Only
//! structural misconfiguration — unreadable base dataset, missing report
//! directory, missing `.prj` sidecar — is a hard failure.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use costat_core::{BaseShapeCache, merge_report};
use costat_ingest::{list_report_files, parse_report};
use costat_shp::{ShpError, copy_projection, write_shapefile};

use crate::cli::ProcessArgs;

/// Outcome of one batch run.
#[derive(Debug)]
pub struct RunSummary {
    /// Reports found in the source directory.
    pub discovered: usize,
    /// Output stems successfully written (or merged, on a dry run).
    pub written: Vec<String>,
    /// Reports skipped as empty/unparsable.
    pub skipped: Vec<(PathBuf, String)>,
    /// Reports whose output failed to serialize.
    pub failed: Vec<(PathBuf, String)>,
    /// Base region count, for the record-count invariant in the summary.
    pub base_regions: usize,
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Run the batch over every report in the source directory.
pub fn run_process(args: &ProcessArgs) -> Result<RunSummary> {
    if args.download {
        warn!("remote download requested but no remote source is configured; processing local reports only");
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.reports_dir.join("output"));

    let cache = BaseShapeCache::load(&args.base)
        .with_context(|| format!("load base shapefile {}", args.base.display()))?;

    let reports = list_report_files(&args.reports_dir)
        .with_context(|| format!("list reports in {}", args.reports_dir.display()))?;
    info!(reports = reports.len(), "discovered report files");

    if !args.dry_run {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("create output directory {}", output_dir.display()))?;
    }

    let mut summary = RunSummary {
        discovered: reports.len(),
        written: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
        base_regions: cache.region_count(),
        output_dir: output_dir.clone(),
        dry_run: args.dry_run,
    };

    for report in &reports {
        let span = info_span!("process_report", report = %report.display());
        let _guard = span.enter();

        let stats = match parse_report(report) {
            Ok(stats) => stats,
            Err(error) if error.is_recoverable() => {
                warn!(%error, "skipping report");
                summary.skipped.push((report.clone(), error.to_string()));
                continue;
            }
            Err(error) => return Err(error).context("read report"),
        };

        let merged = merge_report(&cache, &stats);

        let Some(stem) = report.file_stem().and_then(|s| s.to_str()) else {
            warn!("report has no usable file stem, skipping");
            summary
                .skipped
                .push((report.clone(), "unusable file name".to_string()));
            continue;
        };

        if args.dry_run {
            info!(stem, regions = stats.region_count(), "dry run, not writing");
            summary.written.push(stem.to_string());
            continue;
        }

        let dest = output_dir.join(stem);
        if let Err(error) = write_shapefile(&dest, &merged) {
            warn!(%error, "failed to write output dataset");
            summary.failed.push((report.clone(), error.to_string()));
            continue;
        }

        match copy_projection(cache.source(), &dest) {
            Ok(()) => {}
            Err(err @ ShpError::MissingSidecar { .. }) => {
                // Without the reference system every output is wrong; this is
                // a structural failure, not a per-file anomaly.
                bail!("{err}");
            }
            Err(error) => {
                warn!(%error, "failed to copy projection sidecar");
                summary.failed.push((report.clone(), error.to_string()));
                continue;
            }
        }

        info!(stem, records = merged.num_records(), "wrote output dataset");
        summary.written.push(stem.to_string());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use costat_shp::{
        DbfField, DbfValue, NumericValue, Shape, ShapeRecord, Shapefile, ShpHeader, read_shapefile,
    };
    use std::path::Path;
    use tempfile::TempDir;

    fn write_base(dir: &Path) -> PathBuf {
        let fields = vec![DbfField::character("COUNTY", 14)];
        let records = ["DENVER", "ADAMS", "BOULDER"]
            .iter()
            .map(|name| ShapeRecord {
                values: vec![DbfValue::character(*name)],
                shape: Shape::new({
                    let mut bytes = vec![0u8; 12];
                    bytes[0..4].copy_from_slice(&5i32.to_le_bytes());
                    bytes
                }),
            })
            .collect();
        let base = Shapefile {
            fields,
            records,
            header: ShpHeader {
                shape_type: 5,
                bbox: [0.0; 4],
                z_range: [0.0; 2],
                m_range: [0.0; 2],
            },
        };
        let path = dir.join("COUNTIES");
        costat_shp::write_shapefile(&path, &base).unwrap();
        fs::write(dir.join("COUNTIES.prj"), b"PROJCS[\"NAD83\"]").unwrap();
        path
    }

    fn args(reports_dir: PathBuf, base: PathBuf, output_dir: PathBuf) -> ProcessArgs {
        ProcessArgs {
            reports_dir,
            base,
            output_dir: Some(output_dir),
            download: false,
            dry_run: false,
        }
    }

    #[test]
    fn batch_continues_past_empty_reports() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("downloads");
        fs::create_dir(&reports).unwrap();
        let base = write_base(dir.path());

        fs::write(reports.join("2020-04-14.csv"), "").unwrap();
        fs::write(
            reports.join("2020-04-15.csv"),
            "description,attribute,metric,value\n\
             Case Counts by County,Denver County,,100\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let summary = run_process(&args(reports, base, out.clone())).unwrap();

        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.written, vec!["2020-04-15".to_string()]);
        assert_eq!(summary.skipped.len(), 1);
        assert!(!summary.has_failures());

        // Output carries every base region and the sidecar.
        let written = read_shapefile(&out.join("2020-04-15")).unwrap();
        assert_eq!(written.num_records(), 3);
        assert!(out.join("2020-04-15.prj").is_file());
    }

    #[test]
    fn missing_sidecar_aborts_the_run() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("downloads");
        fs::create_dir(&reports).unwrap();
        let base = write_base(dir.path());
        fs::remove_file(dir.path().join("COUNTIES.prj")).unwrap();

        fs::write(
            reports.join("2020-04-15.csv"),
            "description,attribute,metric,value\n\
             Case Counts by County,Denver County,,100\n",
        )
        .unwrap();

        let result = run_process(&args(reports, base, dir.path().join("out")));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("projection"));
    }

    #[test]
    fn missing_reports_directory_is_structural() {
        let dir = TempDir::new().unwrap();
        let base = write_base(dir.path());
        let result = run_process(&args(
            dir.path().join("no-such-dir"),
            base,
            dir.path().join("out"),
        ));
        assert!(result.is_err());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("downloads");
        fs::create_dir(&reports).unwrap();
        let base = write_base(dir.path());
        fs::write(
            reports.join("2020-04-15.csv"),
            "description,attribute,metric,value\n\
             Case Counts by County,Denver County,,100\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        let mut process_args = args(reports, base, out.clone());
        process_args.dry_run = true;
        let summary = run_process(&process_args).unwrap();

        assert_eq!(summary.written.len(), 1);
        assert!(!out.exists());
    }

    #[test]
    fn dotted_report_names_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("downloads");
        fs::create_dir(&reports).unwrap();
        let base = write_base(dir.path());

        let row = "description,attribute,metric,value\n\
                   Case Counts by County,Denver County,,100\n";
        fs::write(reports.join("covid.2020.04.15.csv"), row).unwrap();
        fs::write(reports.join("covid.2020.04.16.csv"), row).unwrap();

        let out = dir.path().join("out");
        let summary = run_process(&args(reports, base, out.clone())).unwrap();

        assert_eq!(
            summary.written,
            vec!["covid.2020.04.15".to_string(), "covid.2020.04.16".to_string()]
        );
        // Each report keeps its full stem on disk; neither overwrites the
        // other.
        for stem in ["covid.2020.04.15", "covid.2020.04.16"] {
            let dataset = read_shapefile(&out.join(stem)).unwrap();
            assert_eq!(dataset.num_records(), 3);
            assert!(out.join(format!("{stem}.prj")).is_file());
        }
        assert!(!out.join("covid.2020.04.shp").exists());
    }

    #[test]
    fn unreported_regions_carry_absent_markers() {
        let dir = TempDir::new().unwrap();
        let reports = dir.path().join("downloads");
        fs::create_dir(&reports).unwrap();
        let base = write_base(dir.path());
        fs::write(
            reports.join("2020-04-15.csv"),
            "description,attribute,metric,value\n\
             Case Counts by County,Denver County,,100\n",
        )
        .unwrap();

        let out = dir.path().join("out");
        run_process(&args(reports, base, out.clone())).unwrap();

        let written = read_shapefile(&out.join("2020-04-15")).unwrap();
        let adams = written
            .records
            .iter()
            .find(|r| r.values[0] == DbfValue::character("ADAMS"))
            .unwrap();
        for value in &adams.values[1..] {
            assert_eq!(*value, DbfValue::Num(NumericValue::Missing));
        }
        let denver = written
            .records
            .iter()
            .find(|r| r.values[0] == DbfValue::character("DENVER"))
            .unwrap();
        assert_eq!(denver.values[1], DbfValue::numeric(100.0));
    }
}
