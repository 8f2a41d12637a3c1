use crate::{
    error::Result,
    models::{EmergencyContact, Gender, Patient, SearchRecord},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Data-access collaborator behind the search box
#[async_trait]
pub trait RecordDirectory: Send + Sync + 'static {
    type Record: SearchRecord;

    /// Records matching `text`; fails on transport errors
    async fn search(&self, text: &str) -> Result<Vec<Self::Record>>;
}

#[async_trait]
impl<D> RecordDirectory for Arc<D>
where
    D: RecordDirectory + ?Sized,
{
    type Record = D::Record;

    async fn search(&self, text: &str) -> Result<Vec<Self::Record>> {
        (**self).search(text).await
    }
}

/// In-memory patient directory with simulated network latency
pub struct InMemoryPatientDirectory {
    patients: RwLock<Vec<Patient>>,
    latency: Duration,
}

impl InMemoryPatientDirectory {
    pub fn new(patients: Vec<Patient>, latency: Duration) -> Self {
        Self {
            patients: RwLock::new(patients),
            latency,
        }
    }

    /// The three demo patients, answering after `latency`
    pub fn with_demo_patients(latency: Duration) -> Self {
        Self::new(demo_patients(), latency)
    }

    pub async fn get_by_id(&self, id: &str) -> Option<Patient> {
        tokio::time::sleep(self.latency).await;
        self.patients.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn get_by_uhid(&self, uhid: &str) -> Option<Patient> {
        tokio::time::sleep(self.latency).await;
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.uhid == uhid)
            .cloned()
    }

    pub async fn insert(&self, patient: Patient) {
        self.patients.write().await.push(patient);
    }
}

#[async_trait]
impl RecordDirectory for InMemoryPatientDirectory {
    type Record = Patient;

    async fn search(&self, text: &str) -> Result<Vec<Patient>> {
        tokio::time::sleep(self.latency).await;
        let matches: Vec<Patient> = self
            .patients
            .read()
            .await
            .iter()
            .filter(|p| p.matches(text))
            .cloned()
            .collect();
        debug!(matches = matches.len(), "In-memory patient search");
        Ok(matches)
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn patient(
    id: &str,
    uhid: &str,
    name: &str,
    phone: &str,
    born: NaiveDate,
    last_visit: NaiveDate,
    age: u32,
    gender: Gender,
    address: &str,
    contact: (&str, &str, &str),
) -> Patient {
    let email = format!("{}@email.com", name.to_lowercase().replace(' ', "."));
    Patient {
        id: id.to_string(),
        uhid: uhid.to_string(),
        name: name.to_string(),
        email,
        phone: phone.to_string(),
        date_of_birth: born,
        photo: None,
        last_visit,
        age,
        gender,
        address: address.to_string(),
        emergency_contact: EmergencyContact {
            name: contact.0.to_string(),
            phone: contact.1.to_string(),
            relationship: contact.2.to_string(),
        },
    }
}

pub fn demo_patients() -> Vec<Patient> {
    vec![
        patient(
            "1",
            "ELG2024001",
            "John Smith",
            "+1-555-1001",
            date(1985, 3, 15),
            date(2024, 1, 15),
            39,
            Gender::Male,
            "123 Main St, City, State 12345",
            ("Jane Smith", "+1-555-1002", "Spouse"),
        ),
        patient(
            "2",
            "ELG2024002",
            "Maria Garcia",
            "+1-555-1003",
            date(1992, 7, 22),
            date(2024, 1, 20),
            31,
            Gender::Female,
            "456 Oak Ave, City, State 12345",
            ("Carlos Garcia", "+1-555-1004", "Father"),
        ),
        patient(
            "3",
            "ELG2024003",
            "Robert Johnson",
            "+1-555-1005",
            date(1978, 11, 3),
            date(2024, 1, 18),
            45,
            Gender::Male,
            "789 Pine Rd, City, State 12345",
            ("Lisa Johnson", "+1-555-1006", "Spouse"),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> InMemoryPatientDirectory {
        InMemoryPatientDirectory::with_demo_patients(Duration::ZERO)
    }

    async fn names(query: &str) -> Vec<String> {
        directory()
            .search(query)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_name_uhid_email() {
        assert_eq!(names("john").await, ["John Smith", "Robert Johnson"]);
        assert_eq!(names("elg2024002").await, ["Maria Garcia"]);
        assert_eq!(names("ROBERT.JOHNSON@").await, ["Robert Johnson"]);
    }

    #[tokio::test]
    async fn search_matches_phone_substring() {
        assert_eq!(names("555-1003").await, ["Maria Garcia"]);
        assert!(names("555-9999").await.is_empty());
    }

    #[tokio::test]
    async fn lookup_by_id_and_uhid() {
        let directory = directory();
        assert_eq!(
            directory.get_by_id("3").await.map(|p| p.uhid),
            Some("ELG2024003".to_string())
        );
        assert_eq!(
            directory.get_by_uhid("ELG2024001").await.map(|p| p.name),
            Some("John Smith".to_string())
        );
        assert!(directory.get_by_id("42").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn search_waits_for_simulated_latency() {
        let directory = InMemoryPatientDirectory::with_demo_patients(Duration::from_millis(400));
        let started = tokio::time::Instant::now();
        directory.search("maria").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(400));
    }

    #[tokio::test]
    async fn shared_directory_searches_through_arc() {
        let shared: Arc<InMemoryPatientDirectory> = Arc::new(directory());
        shared.insert(demo_patients().remove(0)).await;
        assert_eq!(shared.search("ELG2024001").await.unwrap().len(), 2);
    }
}
