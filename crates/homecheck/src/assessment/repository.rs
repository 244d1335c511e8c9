use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::domain::{AssessmentId, AssessmentRecord};
use super::questionnaire::QuestionDefinition;
use super::report::ReportDocument;

const MASTER_LOG: &str = "all_assessments.csv";

/// Storage abstraction so the service can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: &AssessmentRecord) -> Result<(), RepositoryError>;
    fn store_report(
        &self,
        assessment_id: &AssessmentId,
        report: &ReportDocument,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("assessment {0} already stored")]
    Conflict(AssessmentId),
    #[error("unable to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to encode assessment: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unable to write assessment csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Filesystem repository writing one JSON and one CSV file per assessment plus a
/// master CSV log.
///
/// ```text
/// {data_dir}/assessments/{id}.json
/// {data_dir}/assessments/{id}.csv
/// {data_dir}/reports/{id}.{ext}
/// {data_dir}/all_assessments.csv
/// ```
#[derive(Debug, Clone)]
pub struct FileAssessmentRepository {
    root: PathBuf,
    questions: &'static [QuestionDefinition],
}

impl FileAssessmentRepository {
    pub fn new(
        root: impl Into<PathBuf>,
        questions: &'static [QuestionDefinition],
    ) -> Result<Self, RepositoryError> {
        let repository = Self {
            root: root.into(),
            questions,
        };
        for dir in [repository.assessments_dir(), repository.reports_dir()] {
            fs::create_dir_all(&dir).map_err(|source| RepositoryError::io(&dir, source))?;
        }
        Ok(repository)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assessments_dir(&self) -> PathBuf {
        self.root.join("assessments")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join("reports")
    }

    pub fn master_log_path(&self) -> PathBuf {
        self.root.join(MASTER_LOG)
    }

    fn csv_header(&self) -> Vec<&'static str> {
        let mut header = vec![
            "assessment_id",
            "timestamp",
            "processed_at",
            "email",
            "name",
            "age",
            "gender",
            "physical_score",
            "mental_score",
            "insight_score",
            "tier",
            "physical_delta",
            "mental_delta",
        ];
        header.extend(self.questions.iter().map(|question| question.name));
        header
    }

    fn csv_row(&self, record: &AssessmentRecord) -> Vec<String> {
        let patient = &record.patient;
        let scores = &record.scores;
        let mut row = vec![
            record.assessment_id.to_string(),
            record.timestamp.clone(),
            record.processed_at.to_rfc3339(),
            patient.email.clone(),
            patient.name.clone().unwrap_or_default(),
            patient.age_label().unwrap_or_default(),
            patient.gender.clone().unwrap_or_default(),
            scores.physical_score.to_string(),
            scores.mental_score.to_string(),
            format!("{:.1}", scores.insight_score),
            scores.tier.to_string(),
            scores.physical_delta.to_string(),
            scores.mental_delta.to_string(),
        ];
        row.extend(self.questions.iter().map(|question| {
            record
                .responses
                .get(question.name)
                .cloned()
                .unwrap_or_default()
        }));
        row
    }

    fn write_json(&self, record: &AssessmentRecord) -> Result<(), RepositoryError> {
        let path = self
            .assessments_dir()
            .join(format!("{}.json", record.assessment_id));
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(RepositoryError::Conflict(record.assessment_id.clone()))
            }
            Err(err) => return Err(RepositoryError::io(&path, err)),
        };
        serde_json::to_writer_pretty(&mut file, record)?;
        file.write_all(b"\n")
            .map_err(|source| RepositoryError::io(&path, source))
    }

    /// Removes a JSON snapshot whose CSV counterpart could not be written.
    fn discard_json(&self, assessment_id: &AssessmentId) {
        let path = self.assessments_dir().join(format!("{assessment_id}.json"));
        if let Err(err) = fs::remove_file(&path) {
            warn!(%assessment_id, path = %path.display(), error = %err, "partial assessment left on disk");
        }
    }

    fn write_csv(&self, record: &AssessmentRecord) -> Result<(), RepositoryError> {
        let path = self
            .assessments_dir()
            .join(format!("{}.csv", record.assessment_id));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(self.csv_header())?;
        writer.write_record(self.csv_row(record))?;
        writer
            .flush()
            .map_err(|source| RepositoryError::io(&path, source))
    }

    fn append_master_log(&self, record: &AssessmentRecord) -> Result<(), RepositoryError> {
        let path = self.master_log_path();
        let file_exists = path.is_file();
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| RepositoryError::io(&path, source))?;

        let mut writer = csv::Writer::from_writer(file);
        if !file_exists {
            writer.write_record(self.csv_header())?;
        }
        writer.write_record(self.csv_row(record))?;
        writer
            .flush()
            .map_err(|source| RepositoryError::io(&path, source))
    }
}

impl AssessmentRepository for FileAssessmentRepository {
    fn insert(&self, record: &AssessmentRecord) -> Result<(), RepositoryError> {
        self.write_json(record)?;
        if let Err(err) = self.write_csv(record) {
            self.discard_json(&record.assessment_id);
            return Err(err);
        }

        if let Err(err) = self.append_master_log(record) {
            warn!(assessment_id = %record.assessment_id, error = %err, "master assessment log not updated");
        }

        info!(assessment_id = %record.assessment_id, root = %self.root.display(), "assessment stored");
        Ok(())
    }

    fn store_report(
        &self,
        assessment_id: &AssessmentId,
        report: &ReportDocument,
    ) -> Result<(), RepositoryError> {
        let path = self
            .reports_dir()
            .join(format!("{assessment_id}.{}", report.extension()));
        fs::write(&path, &report.body).map_err(|source| RepositoryError::io(&path, source))
    }
}
