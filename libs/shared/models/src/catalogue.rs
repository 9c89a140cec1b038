//! Static clinic reference data.
//!
//! Departments and the doctor roster are seeded into storage once at startup
//! and never mutated afterwards. Codes are stable identifiers shared by the
//! classifier, the availability engine and the booking store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Department {
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctorSeed {
    pub id: &'static str,
    pub department_code: &'static str,
    pub name: &'static str,
}

/// Department reference as it appears in API payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRef {
    pub code: String,
    pub name: String,
}

impl From<&Department> for DepartmentRef {
    fn from(department: &Department) -> Self {
        Self {
            code: department.code.to_string(),
            name: department.name.to_string(),
        }
    }
}

pub const DEPARTMENTS: &[Department] = &[
    Department { code: "ortopedi", name: "Ortopedi / Fizik Tedavi" },
    Department { code: "kbb", name: "Kulak Burun Boğaz" },
    Department { code: "kardiyoloji", name: "Kardiyoloji" },
    Department { code: "gastro", name: "Gastroenteroloji" },
    Department { code: "dahiliye", name: "Dahiliye (İç Hastalıkları)" },
    Department { code: "dermatoloji", name: "Dermatoloji" },
    Department { code: "uroloji", name: "Üroloji" },
    Department { code: "noroloji", name: "Nöroloji" },
];

pub const DOCTOR_ROSTER: &[DoctorSeed] = &[
    DoctorSeed { id: "d1", department_code: "ortopedi", name: "Uzm. Dr. Ayşe Yılmaz" },
    DoctorSeed { id: "d2", department_code: "ortopedi", name: "Op. Dr. Mert Kaya" },
    DoctorSeed { id: "d3", department_code: "kbb", name: "Uzm. Dr. Elif Demir" },
    DoctorSeed { id: "d4", department_code: "kardiyoloji", name: "Uzm. Dr. Can Şahin" },
    DoctorSeed { id: "d5", department_code: "gastro", name: "Uzm. Dr. Gökhan Aksoy" },
    DoctorSeed { id: "d6", department_code: "dahiliye", name: "Uzm. Dr. Seda Karaca" },
    DoctorSeed { id: "d7", department_code: "dermatoloji", name: "Uzm. Dr. Burcu Kar" },
    DoctorSeed { id: "d8", department_code: "uroloji", name: "Uzm. Dr. Emre Tunç" },
    DoctorSeed { id: "d9", department_code: "noroloji", name: "Uzm. Dr. Nil Sezer" },
];

pub fn find_department(code: &str) -> Option<&'static Department> {
    DEPARTMENTS.iter().find(|d| d.code == code)
}
