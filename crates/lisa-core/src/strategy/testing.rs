//! Scratch trees and recording doubles for strategy tests

use std::fs;
use std::path::{Path, PathBuf};

use lisa_fs::NormalizedPath;
use tempfile::TempDir;

use crate::Result;
use crate::config::ApplyConfig;
use crate::context::{FileBackup, FileRecorder, OverwritePrompt, StrategyContext};
use crate::kind::StrategyKind;
use crate::report::FileOperationResult;
use crate::strategy::{FileJob, Plan, Strategy};

#[derive(Debug, Default)]
pub(crate) struct Recorded(pub Vec<(NormalizedPath, StrategyKind)>);

impl FileRecorder for Recorded {
    fn record(&mut self, relative: &NormalizedPath, kind: StrategyKind) {
        self.0.push((relative.clone(), kind));
    }
}

#[derive(Debug, Default)]
pub(crate) struct Backups(pub Vec<NormalizedPath>);

impl FileBackup for Backups {
    fn before_mutation(&mut self, relative: &NormalizedPath, _path: &Path) -> Result<()> {
        self.0.push(relative.clone());
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct Answer(pub bool);

impl OverwritePrompt for Answer {
    fn confirm_overwrite(&self, _: &NormalizedPath, _: &Path, _: &Path) -> Result<bool> {
        Ok(self.0)
    }
}

pub(crate) struct Harness {
    _root: TempDir,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub config: ApplyConfig,
    pub chain: Vec<String>,
    pub recorded: Recorded,
    pub backups: Backups,
    pub answer: Answer,
}

impl Harness {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let source_dir = root.path().join("lisa");
        let dest_dir = root.path().join("project");
        fs::create_dir_all(&source_dir).unwrap();
        fs::create_dir_all(&dest_dir).unwrap();

        Self {
            config: ApplyConfig::new(&source_dir, &dest_dir),
            _root: root,
            source_dir,
            dest_dir,
            chain: vec!["all".to_string()],
            recorded: Recorded::default(),
            backups: Backups::default(),
            answer: Answer(true),
        }
    }

    pub fn dry_run(mut self) -> Self {
        self.config.dry_run = true;
        self
    }

    pub fn declining(mut self) -> Self {
        self.answer = Answer(false);
        self
    }

    /// Write an authoritative file below `<source>/<type>/<strategy>/`.
    pub fn write_source(&self, label: &str, kind: StrategyKind, relative: &str, content: &str) -> PathBuf {
        let path = self.source_dir.join(label).join(kind.as_str()).join(relative);
        lisa_fs::write_text(&path, content).unwrap();
        path
    }

    pub fn write_dest(&self, relative: &str, content: &str) {
        lisa_fs::write_text(&self.dest_dir.join(relative), content).unwrap();
    }

    pub fn read_dest(&self, relative: &str) -> String {
        fs::read_to_string(self.dest_dir.join(relative)).unwrap()
    }

    /// Job for an authoritative `all/<strategy>/<relative>` file.
    pub fn job(&self, strategy: &dyn Strategy, relative: &str, content: &str) -> FileJob {
        let source = self.write_source("all", strategy.kind(), relative, content);
        let origin = NormalizedPath::new(relative);
        let target = strategy.target_path(&origin);
        FileJob {
            source,
            dest: target.under(&self.dest_dir),
            relative: target,
            origin,
        }
    }

    pub fn plan(&mut self, strategy: &dyn Strategy, job: &FileJob) -> Result<Plan> {
        let ctx = StrategyContext::new(
            &self.config,
            &self.chain,
            &mut self.recorded,
            &mut self.backups,
            &self.answer,
        );
        strategy.plan(job, &ctx)
    }

    pub fn run(&mut self, strategy: &dyn Strategy, job: &FileJob) -> Result<FileOperationResult> {
        let mut ctx = StrategyContext::new(
            &self.config,
            &self.chain,
            &mut self.recorded,
            &mut self.backups,
            &self.answer,
        );
        strategy.apply(job, &mut ctx)
    }
}
