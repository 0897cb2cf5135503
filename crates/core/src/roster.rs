//! Read-only access to classes and students.
//!
//! Class and student management lives outside the engine. The engine only
//! needs to list who is enrolled in a class, which is what [`Roster`]
//! provides.

use crate::models::roster::{Class, Student};

pub trait Roster: Send + Sync {
    fn list_classes(&self) -> Vec<Class>;

    fn get_class(&self, class_id: &str) -> Option<Class>;

    fn list_students(&self) -> Vec<Student>;

    /// Students whose owning class is `class_id`, in roster order.
    fn list_students_by_class(&self, class_id: &str) -> Vec<Student>;
}

/// Roster backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRoster {
    classes: Vec<Class>,
    students: Vec<Student>,
}

impl InMemoryRoster {
    pub fn new(classes: Vec<Class>, students: Vec<Student>) -> Self {
        Self { classes, students }
    }
}

impl Roster for InMemoryRoster {
    fn list_classes(&self) -> Vec<Class> {
        self.classes.clone()
    }

    fn get_class(&self, class_id: &str) -> Option<Class> {
        self.classes.iter().find(|c| c.id == class_id).cloned()
    }

    fn list_students(&self) -> Vec<Student> {
        self.students.clone()
    }

    fn list_students_by_class(&self, class_id: &str) -> Vec<Student> {
        self.students
            .iter()
            .filter(|s| s.class_id == class_id)
            .cloned()
            .collect()
    }
}
