use super::IEmailTemplateRepo;
use mingle_notify_domain::{EmailTemplate, TemplateCategory, ID};
use sqlx::{types::Json, types::Uuid, FromRow, PgPool};

pub struct PostgresEmailTemplateRepo {
    pool: PgPool,
}

impl PostgresEmailTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmailTemplateRaw {
    template_uid: Uuid,
    name: String,
    category: String,
    version: i64,
    subject: String,
    html_body: String,
    text_body: String,
    variables: Json<Vec<String>>,
}

impl From<EmailTemplateRaw> for EmailTemplate {
    fn from(raw: EmailTemplateRaw) -> Self {
        Self {
            id: raw.template_uid.into(),
            name: raw.name,
            category: raw
                .category
                .parse()
                .unwrap_or(TemplateCategory::Transactional),
            version: raw.version,
            subject: raw.subject,
            html_body: raw.html_body,
            text_body: raw.text_body,
            variables: raw.variables.0,
        }
    }
}

#[async_trait::async_trait]
impl IEmailTemplateRepo for PostgresEmailTemplateRepo {
    async fn insert(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_templates
            (template_uid, name, category, version, subject, html_body, text_body, variables)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(template.id.inner_ref())
        .bind(&template.name)
        .bind(template.category.as_str())
        .bind(template.version)
        .bind(&template.subject)
        .bind(&template.html_body)
        .bind(&template.text_body)
        .bind(Json(&template.variables))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE email_templates SET
                name = $2,
                category = $3,
                version = $4,
                subject = $5,
                html_body = $6,
                text_body = $7,
                variables = $8
            WHERE template_uid = $1
            "#,
        )
        .bind(template.id.inner_ref())
        .bind(&template.name)
        .bind(template.category.as_str())
        .bind(template.version)
        .bind(&template.subject)
        .bind(&template.html_body)
        .bind(&template.text_body)
        .bind(Json(&template.variables))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, template_id: &ID) -> Option<EmailTemplate> {
        sqlx::query_as::<_, EmailTemplateRaw>(
            r#"
            SELECT * FROM email_templates
            WHERE template_uid = $1
            "#,
        )
        .bind(template_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .ok()
        .flatten()
        .map(Into::into)
    }
}
