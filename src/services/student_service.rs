use crate::entities::{UserRole, student_entity as students, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateCabangStudentRequest, CreateStudentRequest, CreatedStudentResponse, StudentResponse,
};
use crate::utils::{hash_password, validate_password};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

const DEFAULT_STUDENT_PASSWORD: &str = "123456";

#[derive(Clone)]
pub struct StudentService {
    pool: std::sync::Arc<DatabaseConnection>,
}

impl StudentService {
    pub fn new(pool: std::sync::Arc<DatabaseConnection>) -> Self {
        Self { pool }
    }

    /// Buat siswa sekaligus akun loginnya (username = NIS).
    /// Kredensial awal dikembalikan supaya bisa dibagikan ke siswa.
    pub async fn create(&self, req: CreateStudentRequest) -> AppResult<CreatedStudentResponse> {
        let nis = req.nis.trim().to_lowercase();
        let nama = req.nama.trim().to_string();
        let kelas = req.kelas.trim().to_string();
        if nis.is_empty() || nama.is_empty() || kelas.is_empty() {
            return Err(AppError::ValidationError(
                "nis/nama/kelas wajib".to_string(),
            ));
        }

        let password = req
            .password
            .unwrap_or_else(|| DEFAULT_STUDENT_PASSWORD.to_string());
        validate_password(&password)?;

        self.insert_student_with_account(nis, nama, kelas, None, req.branch_id, password)
            .await
    }

    /// Varian admin cabang: siswa otomatis masuk cabang admin,
    /// kelas diisi "-" (dilengkapi belakangan).
    pub async fn create_for_branch(
        &self,
        branch_id: Uuid,
        req: CreateCabangStudentRequest,
    ) -> AppResult<CreatedStudentResponse> {
        let username = req.username.trim().to_lowercase();
        let nama = req.nama.trim().to_string();
        if username.is_empty() || nama.is_empty() || req.password.is_empty() {
            return Err(AppError::ValidationError(
                "username, nama, password wajib".to_string(),
            ));
        }
        validate_password(&req.password)?;

        let phone = req.phone.filter(|p| !p.trim().is_empty());

        self.insert_student_with_account(
            username,
            nama,
            "-".to_string(),
            phone,
            Some(branch_id),
            req.password,
        )
        .await
    }

    pub async fn list(&self, branch_id: Option<Uuid>) -> AppResult<Vec<StudentResponse>> {
        let mut query = students::Entity::find();
        if let Some(b) = branch_id {
            query = query.filter(students::Column::BranchId.eq(b));
        }
        let list = query
            .order_by_asc(students::Column::Nama)
            .all(&*self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    /// Hapus siswa berikut akun loginnya. Riwayat invoice sengaja tidak
    /// ikut dihapus; FK akan menolak kalau masih ada tagihan.
    pub async fn delete(&self, student_id: Uuid) -> AppResult<()> {
        users::Entity::delete_many()
            .filter(users::Column::StudentId.eq(student_id))
            .exec(&*self.pool)
            .await?;

        let res = students::Entity::delete_by_id(student_id)
            .exec(&*self.pool)
            .await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound("Siswa tidak ditemukan.".to_string()));
        }
        Ok(())
    }

    async fn insert_student_with_account(
        &self,
        nis: String,
        nama: String,
        kelas: String,
        phone: Option<String>,
        branch_id: Option<Uuid>,
        password: String,
    ) -> AppResult<CreatedStudentResponse> {
        // username dipakai lintas role, cek dulu supaya errornya enak dibaca
        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(nis.clone()))
            .one(&*self.pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::ValidationError(
                "Username sudah terdaftar".to_string(),
            ));
        }

        let student = students::ActiveModel {
            id: Set(Uuid::new_v4()),
            nis: Set(nis.clone()),
            nama: Set(nama.clone()),
            kelas: Set(kelas),
            phone: Set(phone),
            branch_id: Set(branch_id),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(nis.clone()),
            password_hash: Set(hash_password(&password)?),
            role: Set(UserRole::Siswa),
            name: Set(Some(nama)),
            student_id: Set(Some(student.id)),
            branch_id: Set(branch_id),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&*self.pool)
        .await?;

        Ok(CreatedStudentResponse {
            student: student.into(),
            username: nis,
            password,
        })
    }
}
