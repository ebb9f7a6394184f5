use crate::error::AqualertError;
use crate::model::{VillageId, WaterBodyId, WorkerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::info;

/// Resolves the village that owns a water body.
pub trait VillageLookup {
    fn village_of(&self, water_body_id: WaterBodyId) -> Option<VillageId>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Village {
    pub id: VillageId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterBody {
    pub id: WaterBodyId,
    pub village_id: VillageId,
    pub name: String,
    /// Well, pond, river, ...
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    pub worker_id: WorkerId,
    pub water_body_id: WaterBodyId,
}

/// In-memory directory of villages, their water bodies and which workers
/// report on which water body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub villages: Vec<Village>,
    #[serde(default)]
    pub water_bodies: Vec<WaterBody>,
    #[serde(default)]
    assignments: BTreeSet<Assignment>,
}

impl Directory {
    /// Load a directory from a JSON file.
    pub fn load(path: &Path) -> Result<Self, AqualertError> {
        let content = std::fs::read_to_string(path).map_err(|e| AqualertError::DirectoryLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, AqualertError> {
        let directory: Directory = serde_json::from_str(json)?;
        for wb in &directory.water_bodies {
            if directory.village(wb.village_id).is_none() {
                info!(
                    water_body_id = wb.id,
                    village_id = wb.village_id,
                    "water body references a village that is not listed"
                );
            }
        }
        Ok(directory)
    }

    pub fn village(&self, id: VillageId) -> Option<&Village> {
        self.villages.iter().find(|v| v.id == id)
    }

    pub fn water_body(&self, id: WaterBodyId) -> Option<&WaterBody> {
        self.water_bodies.iter().find(|wb| wb.id == id)
    }

    /// Water bodies owned by a village, in directory order.
    pub fn water_bodies_in(&self, village_id: VillageId) -> Vec<&WaterBody> {
        self.water_bodies
            .iter()
            .filter(|wb| wb.village_id == village_id)
            .collect()
    }

    /// Assign a worker to a water body. Assigning twice is a no-op.
    pub fn assign(
        &mut self,
        worker_id: WorkerId,
        water_body_id: WaterBodyId,
    ) -> Result<bool, AqualertError> {
        if self.water_body(water_body_id).is_none() {
            return Err(AqualertError::WaterBodyNotFound(water_body_id));
        }
        let added = self.assignments.insert(Assignment {
            worker_id,
            water_body_id,
        });
        if added {
            info!(worker_id, water_body_id, "worker assigned");
        }
        Ok(added)
    }

    /// Remove an assignment. Returns whether one existed.
    pub fn unassign(&mut self, worker_id: WorkerId, water_body_id: WaterBodyId) -> bool {
        self.assignments.remove(&Assignment {
            worker_id,
            water_body_id,
        })
    }

    /// Remove every assignment held by a worker.
    pub fn remove_worker(&mut self, worker_id: WorkerId) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|a| a.worker_id != worker_id);
        before - self.assignments.len()
    }

    pub fn is_assigned(&self, worker_id: WorkerId, water_body_id: WaterBodyId) -> bool {
        self.assignments.contains(&Assignment {
            worker_id,
            water_body_id,
        })
    }

    /// Water bodies a worker reports on.
    pub fn water_bodies_for(&self, worker_id: WorkerId) -> Vec<&WaterBody> {
        self.assignments
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .filter_map(|a| self.water_body(a.water_body_id))
            .collect()
    }

    /// Workers assigned to a water body.
    pub fn workers_for(&self, water_body_id: WaterBodyId) -> Vec<WorkerId> {
        self.assignments
            .iter()
            .filter(|a| a.water_body_id == water_body_id)
            .map(|a| a.worker_id)
            .collect()
    }

    /// Reject a submission from a worker not assigned to the water body.
    pub fn check_assignment(
        &self,
        worker_id: WorkerId,
        water_body_id: WaterBodyId,
    ) -> Result<(), AqualertError> {
        if self.water_body(water_body_id).is_none() {
            return Err(AqualertError::WaterBodyNotFound(water_body_id));
        }
        if !self.is_assigned(worker_id, water_body_id) {
            return Err(AqualertError::WorkerNotAssigned {
                worker_id,
                water_body_id,
            });
        }
        Ok(())
    }
}

impl VillageLookup for Directory {
    fn village_of(&self, water_body_id: WaterBodyId) -> Option<VillageId> {
        self.water_body(water_body_id).map(|wb| wb.village_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DIRECTORY_JSON: &str = r#"{
        "villages": [
            { "id": 1, "name": "Rampur" },
            { "id": 2, "name": "Sitapur" }
        ],
        "water_bodies": [
            { "id": 10, "village_id": 1, "name": "North well", "type": "well" },
            { "id": 11, "village_id": 1, "name": "Temple pond", "type": "pond" },
            { "id": 20, "village_id": 2, "name": "River ghat" }
        ],
        "assignments": [
            { "worker_id": 2, "water_body_id": 10 }
        ]
    }"#;

    fn directory() -> Directory {
        Directory::from_json(DIRECTORY_JSON).unwrap()
    }

    #[test]
    fn test_village_lookup() {
        let d = directory();
        assert_eq!(d.village_of(11), Some(1));
        assert_eq!(d.village_of(20), Some(2));
        assert_eq!(d.village_of(99), None);
        assert_eq!(d.water_body(10).unwrap().kind.as_deref(), Some("well"));
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut d = directory();
        assert!(d.assign(2, 11).unwrap());
        assert!(!d.assign(2, 11).unwrap());
        let names: Vec<&str> = d.water_bodies_for(2).iter().map(|wb| wb.name.as_str()).collect();
        assert_eq!(names, vec!["North well", "Temple pond"]);
    }

    #[test]
    fn test_assign_unknown_water_body() {
        let mut d = directory();
        assert!(matches!(
            d.assign(2, 99),
            Err(AqualertError::WaterBodyNotFound(99))
        ));
    }

    #[test]
    fn test_unassign_and_remove_worker() {
        let mut d = directory();
        d.assign(2, 20).unwrap();
        d.assign(3, 20).unwrap();
        assert!(d.unassign(2, 10));
        assert!(!d.unassign(2, 10));
        assert_eq!(d.workers_for(20), vec![2, 3]);
        assert_eq!(d.remove_worker(2), 1);
        assert_eq!(d.workers_for(20), vec![3]);
    }

    #[test]
    fn test_check_assignment() {
        let d = directory();
        assert!(d.check_assignment(2, 10).is_ok());
        assert!(matches!(
            d.check_assignment(3, 10),
            Err(AqualertError::WorkerNotAssigned {
                worker_id: 3,
                water_body_id: 10
            })
        ));
        assert!(matches!(
            d.check_assignment(2, 99),
            Err(AqualertError::WaterBodyNotFound(99))
        ));
    }

    #[test]
    fn test_water_bodies_in_village() {
        let d = directory();
        assert_eq!(d.water_bodies_in(1).len(), 2);
        assert_eq!(d.water_bodies_in(3).len(), 0);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DIRECTORY_JSON.as_bytes()).unwrap();
        let d = Directory::load(file.path()).unwrap();
        assert_eq!(d.villages.len(), 2);
    }

    #[test]
    fn test_load_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-directory.json");
        let err = Directory::load(&path).unwrap_err();
        assert!(matches!(err, AqualertError::DirectoryLoad { .. }));
        assert!(err.to_string().contains("missing-directory.json"));
    }
}
