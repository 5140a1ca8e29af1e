use std::collections::BTreeMap;

use crate::models::{Course, Enrollment, Role, Student, User};

/// Table
///
/// A single keyed collection. Keys are unique by construction, so lookups and
/// duplicate checks are map operations rather than scans.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<K: Ord, V> {
    rows: BTreeMap<K, V>,
}

impl<K: Ord, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<K: Ord, V> Table<K, V> {
    /// Every row in key order.
    pub fn scan(&self) -> impl Iterator<Item = &V> {
        self.rows.values()
    }

    pub fn find_by_key(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    pub fn find_by_key_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    /// Inserts or replaces the row under `key`, returning the previous row.
    pub fn insert(&mut self, key: K, row: V) -> Option<V> {
        self.rows.insert(key, row)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.rows.remove(key)
    }

    /// Keeps only the rows matching `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, &V) -> bool) {
        self.rows.retain(|k, v| keep(k, v));
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Tables
///
/// The four collections of the registry. Always accessed as a unit behind the
/// repository's lock.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tables {
    pub users: Table<String, User>,
    pub students: Table<String, Student>,
    pub courses: Table<String, Course>,
    pub enrollments: Table<(String, String), Enrollment>,
}

impl Tables {
    /// The default seeded dataset restored by every reset.
    pub fn fixture() -> Self {
        let mut tables = Tables::default();

        for user in fixture_users() {
            tables.users.insert(user.username.clone(), user);
        }
        for course in fixture_courses() {
            tables.courses.insert(course.course_id.clone(), course);
        }
        for student in fixture_students() {
            tables.students.insert(student.student_id.clone(), student);
        }
        // Enrollments are derived from the seeded students so both views agree.
        let seeded: Vec<Enrollment> = tables
            .students
            .scan()
            .flat_map(|s| {
                s.courses
                    .iter()
                    .map(move |c| Enrollment::new(s.student_id.clone(), c.clone()))
            })
            .collect();
        for enrollment in seeded {
            tables.enrollments.insert(enrollment.key(), enrollment);
        }

        tables
    }

    /// Clears all collections and reseeds the fixture in place.
    pub fn reset(&mut self) {
        *self = Tables::fixture();
    }

    /// Enrollment records belonging to one student.
    pub fn enrollments_of<'a>(&'a self, student_id: &'a str) -> impl Iterator<Item = &'a Enrollment> {
        self.enrollments
            .scan()
            .filter(move |e| e.student_id == student_id)
    }
}

fn fixture_users() -> Vec<User> {
    let user = |username: &str, password: &str, role: Role, student_id: Option<&str>| User {
        username: username.to_string(),
        password: password.to_string(),
        role,
        student_id: student_id.map(str::to_string),
    };

    vec![
        user("admin1", "pass1", Role::Admin, None),
        user("admin2", "pass2", Role::Admin, None),
        user("student1", "pass3", Role::Student, Some("S1")),
        user("student2", "pass4", Role::Student, Some("S2")),
        user("student3", "pass5", Role::Student, Some("S3")),
    ]
}

fn fixture_courses() -> Vec<Course> {
    let course = |id: &str, title: &str, instructors: &[&str]| Course {
        course_id: id.to_string(),
        course_title: title.to_string(),
        instructors: instructors.iter().map(|i| i.to_string()).collect(),
    };

    vec![
        course("C1", "Computer Programming", &["A. Wongsa"]),
        course("C2", "Data Structures", &["P. Chaiyo"]),
        course("C3", "Database Systems", &["K. Boonmee", "A. Wongsa"]),
        course("C4", "Web Development", &["N. Thongdee"]),
    ]
}

fn fixture_students() -> Vec<Student> {
    let student = |id: &str, first: &str, last: &str, program: &str, courses: &[&str]| Student {
        student_id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        program: program.to_string(),
        courses: courses.iter().map(|c| c.to_string()).collect(),
    };

    vec![
        student("S1", "Somchai", "Jaidee", "CPE", &["C2"]),
        student("S2", "Suda", "Rakdee", "CPE", &["C1", "C3"]),
        student("S3", "Anan", "Meesuk", "ISNE", &[]),
    ]
}
