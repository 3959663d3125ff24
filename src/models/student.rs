use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::student_entity as students;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: Uuid,
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    pub phone: Option<String>,
    pub branch_id: Option<Uuid>,
}

impl From<students::Model> for StudentResponse {
    fn from(m: students::Model) -> Self {
        StudentResponse {
            id: m.id,
            nis: m.nis,
            nama: m.nama,
            kelas: m.kelas,
            phone: m.phone,
            branch_id: m.branch_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub nis: String,
    pub nama: String,
    pub kelas: String,
    /// Default "123456" kalau tidak dikirim
    pub password: Option<String>,
    pub branch_id: Option<Uuid>,
}

/// Pembuatan siswa oleh admin cabang: username jadi NIS, kelas default "-".
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCabangStudentRequest {
    pub username: String,
    pub nama: String,
    pub phone: Option<String>,
    pub password: String,
}

/// Dikembalikan ke admin supaya kredensial awal bisa dibagikan ke siswa.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreatedStudentResponse {
    pub student: StudentResponse,
    pub username: String,
    pub password: String,
}
