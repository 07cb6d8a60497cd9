use serde_json::Value;
use tokio_postgres::types::ToSql;
use tracing::instrument;

use crate::db::util::{TimedClientExt, count_to_u32};
use crate::db::{PgPool, db_error};
use crate::insights::NetworkSnapshot;
use crate::query_templates::{ML_SKILLS, QueryTemplate, TEMPLATE_ROW_LIMIT, TemplateOutput, WEB_SKILLS};

db_error!(AnalyticsError {});

const MOST_CONNECTED_SQL: &str = "SELECT json_build_object(
        'user_id', u.user_id, 'name', u.name, 'title', u.title,
        'connections', COUNT(k.dst)) AS item
 FROM sn.users u
 LEFT JOIN sn.knows k ON k.src = u.user_id
 GROUP BY u.user_id, u.name, u.title
 ORDER BY COUNT(k.dst) DESC, u.name, u.user_id
 LIMIT $1";

const POPULAR_SKILLS_SQL: &str = "SELECT json_build_object(
        'skill', s.name, 'category', s.category, 'user_count', COUNT(us.user_id)) AS item
 FROM sn.skills s
 JOIN sn.user_skills us ON us.skill_name = s.name
 GROUP BY s.name, s.category
 ORDER BY COUNT(us.user_id) DESC, s.name
 LIMIT $1";

const USERS_WITH_SKILLS_SQL: &str = "SELECT json_build_object(
        'user_id', u.user_id, 'name', u.name, 'title', u.title,
        'skills', array_agg(us.skill_name ORDER BY us.skill_name)) AS item
 FROM sn.users u
 JOIN sn.user_skills us ON us.user_id = u.user_id
 WHERE us.skill_name = ANY($2)
 GROUP BY u.user_id, u.name, u.title
 ORDER BY COUNT(*) DESC, u.name, u.user_id
 LIMIT $1";

const NETWORK_STATISTICS_SQL: &str = "SELECT json_build_object(
        'total_users', (SELECT COUNT(*) FROM sn.users),
        'total_connections', (SELECT COUNT(*) FROM sn.connections),
        'total_skills', (SELECT COUNT(*) FROM sn.skills),
        'total_companies', (SELECT COUNT(*) FROM sn.companies),
        'avg_connections', COALESCE(
            (SELECT 2.0 * COUNT(*) FROM sn.connections)
              / NULLIF((SELECT COUNT(*) FROM sn.users), 0), 0)) AS item";

const TOP_COMPANIES_SQL: &str = "SELECT json_build_object(
        'company', c.name, 'industry', c.industry, 'employee_count', COUNT(e.user_id)) AS item
 FROM sn.companies c
 LEFT JOIN sn.employment e ON e.company_name = c.name
 GROUP BY c.name, c.industry
 ORDER BY COUNT(e.user_id) DESC, c.name
 LIMIT $1";

const SKILL_DISTRIBUTION_SQL: &str = "SELECT json_build_object(
        'category', COALESCE(s.category, 'Uncategorized'),
        'skill_count', COUNT(DISTINCT s.name),
        'user_count', COUNT(DISTINCT us.user_id)) AS item
 FROM sn.skills s
 LEFT JOIN sn.user_skills us ON us.skill_name = s.name
 GROUP BY COALESCE(s.category, 'Uncategorized')
 ORDER BY COUNT(DISTINCT us.user_id) DESC, COALESCE(s.category, 'Uncategorized')";

const USER_CONNECTIONS_SQL: &str = "SELECT json_build_object(
        'user_id', u.user_id, 'name', u.name, 'title', u.title, 'company', e.company_name) AS item
 FROM sn.knows k
 JOIN sn.users u ON u.user_id = k.dst
 LEFT JOIN sn.employment e ON e.user_id = u.user_id
 WHERE k.src = $2
 ORDER BY u.name, u.user_id
 LIMIT $1";

const SAMPLE_USERS_SQL: &str = "SELECT json_build_object(
        'user_id', u.user_id, 'name', u.name, 'title', u.title) AS item
 FROM sn.users u
 ORDER BY u.name, u.user_id
 LIMIT $1";

pub fn template_statement(template: &QueryTemplate) -> &'static str {
    match template {
        QueryTemplate::MostConnected => MOST_CONNECTED_SQL,
        QueryTemplate::PopularSkills => POPULAR_SKILLS_SQL,
        QueryTemplate::MlDevelopers | QueryTemplate::WebDevelopers => USERS_WITH_SKILLS_SQL,
        QueryTemplate::NetworkStatistics => NETWORK_STATISTICS_SQL,
        QueryTemplate::TopCompanies => TOP_COMPANIES_SQL,
        QueryTemplate::SkillDistribution => SKILL_DISTRIBUTION_SQL,
        QueryTemplate::UserConnections { .. } => USER_CONNECTIONS_SQL,
        QueryTemplate::SampleUsers => SAMPLE_USERS_SQL,
    }
}

#[instrument(skip(pool))]
pub async fn ping(pool: &PgPool) -> Result<(), AnalyticsError> {
    let client = pool.get().await?;
    client.timed_query_one("SELECT 1", &[], "ping").await?;
    Ok(())
}

#[instrument(skip(pool))]
pub async fn run_template(pool: &PgPool, template: &QueryTemplate) -> Result<TemplateOutput, AnalyticsError> {
    let client = pool.get().await?;
    let statement = template_statement(template);
    let limit = TEMPLATE_ROW_LIMIT;

    let skills: Vec<&str> = match template {
        QueryTemplate::MlDevelopers => ML_SKILLS.to_vec(),
        QueryTemplate::WebDevelopers => WEB_SKILLS.to_vec(),
        _ => Vec::new(),
    };
    let params: Vec<&(dyn ToSql + Sync)> = match template {
        QueryTemplate::NetworkStatistics | QueryTemplate::SkillDistribution => Vec::new(),
        QueryTemplate::MlDevelopers | QueryTemplate::WebDevelopers => vec![&limit, &skills],
        QueryTemplate::UserConnections { user_id } => vec![&limit, user_id],
        _ => vec![&limit],
    };

    let rows = client
        .timed_query(statement, &params, template.as_ref())
        .await?;

    Ok(TemplateOutput {
        statement: statement.to_string(),
        rows: rows.into_iter().map(|row| row.get::<_, Value>("item")).collect(),
    })
}

// Triangles count ordered friend pairs over `sn.knows`, so each triangle
// appears once per direction.
const NETWORK_SNAPSHOT_SQL: &str = "WITH friends AS (
         SELECT dst AS friend_id FROM sn.knows WHERE src = $1
     )
     SELECT u.user_id, u.name, u.title, e.company_name AS company,
            (SELECT COUNT(*) FROM friends) AS connection_count,
            COALESCE((SELECT array_agg(us.skill_name ORDER BY us.skill_name)
                      FROM sn.user_skills us WHERE us.user_id = u.user_id), '{}') AS skills,
            (SELECT COUNT(*) FROM sn.knows k
               JOIN friends fa ON fa.friend_id = k.src
               JOIN friends fb ON fb.friend_id = k.dst) AS triangles
     FROM sn.users u
     LEFT JOIN sn.employment e ON e.user_id = u.user_id
     WHERE u.user_id = $1";

#[instrument(skip(pool))]
pub async fn fetch_network_snapshot(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<NetworkSnapshot>, AnalyticsError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt(NETWORK_SNAPSHOT_SQL, &[&user_id], "fetch_network_snapshot")
        .await?;

    Ok(row.map(|row| NetworkSnapshot {
        user_id: row.get("user_id"),
        name: row.get("name"),
        title: row.get("title"),
        company: row.get("company"),
        connection_count: count_to_u32(row.get("connection_count")),
        skills: row.get("skills"),
        triangles: count_to_u32(row.get("triangles")),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_templates_are_row_limited() {
        for template in [
            QueryTemplate::MostConnected,
            QueryTemplate::PopularSkills,
            QueryTemplate::MlDevelopers,
            QueryTemplate::TopCompanies,
            QueryTemplate::SampleUsers,
            QueryTemplate::UserConnections {
                user_id: "user-1".into(),
            },
        ] {
            assert!(template_statement(&template).contains("LIMIT $1"));
        }
    }

    #[test]
    fn snapshot_triangles_count_both_directions() {
        assert!(NETWORK_SNAPSHOT_SQL.contains("FROM sn.knows k"));
        assert!(NETWORK_SNAPSHOT_SQL.contains("fa.friend_id = k.src"));
        assert!(NETWORK_SNAPSHOT_SQL.contains("fb.friend_id = k.dst"));
        assert!(!NETWORK_SNAPSHOT_SQL.contains("sn.connections"));
    }

    #[test]
    fn skill_templates_share_a_statement() {
        assert_eq!(
            template_statement(&QueryTemplate::MlDevelopers),
            template_statement(&QueryTemplate::WebDevelopers)
        );
    }
}
