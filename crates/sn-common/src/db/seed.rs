use tracing::{info, instrument};

use crate::db::util::TimedClientExt;
use crate::db::{PgPool, db_error};
use crate::seed::{COMPANIES, SKILLS, SeedNetwork};

db_error!(SeedError {});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: u64,
    pub user_skills: u64,
    pub employments: u64,
    pub connections: u64,
}

/// Write a generated network in one transaction. Existing rows are kept
/// unless `reset` truncates the graph tables first.
#[instrument(skip(pool, network), fields(users = network.users.len()))]
pub async fn apply_seed(
    pool: &PgPool,
    network: &SeedNetwork,
    reset: bool,
) -> Result<SeedSummary, SeedError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    if reset {
        tx.batch_execute(
            "TRUNCATE sn.connections, sn.employment, sn.user_skills, sn.users, sn.skills, sn.companies",
        )
        .await?;
        info!("truncated graph tables");
    }

    let names: Vec<&str> = COMPANIES.iter().map(|c| c.name).collect();
    let industries: Vec<&str> = COMPANIES.iter().map(|c| c.industry).collect();
    let locations: Vec<&str> = COMPANIES.iter().map(|c| c.location).collect();
    let sizes: Vec<&str> = COMPANIES.iter().map(|c| c.size).collect();
    tx.timed_execute(
        "INSERT INTO sn.companies (name, industry, location, size)
         SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[])
         ON CONFLICT (name) DO UPDATE
            SET industry = EXCLUDED.industry, location = EXCLUDED.location, size = EXCLUDED.size",
        &[&names, &industries, &locations, &sizes],
        "seed_companies",
    )
    .await?;

    let skill_names: Vec<&str> = SKILLS.iter().map(|(name, _)| *name).collect();
    let categories: Vec<&str> = SKILLS.iter().map(|(_, category)| *category).collect();
    tx.timed_execute(
        "INSERT INTO sn.skills (name, category)
         SELECT * FROM UNNEST($1::text[], $2::text[])
         ON CONFLICT (name) DO UPDATE SET category = EXCLUDED.category",
        &[&skill_names, &categories],
        "seed_skills",
    )
    .await?;

    let ids: Vec<&str> = network.users.iter().map(|u| u.user_id.as_str()).collect();
    let user_names: Vec<&str> = network.users.iter().map(|u| u.name.as_str()).collect();
    let emails: Vec<&str> = network.users.iter().map(|u| u.email.as_str()).collect();
    let titles: Vec<&str> = network.users.iter().map(|u| u.title.as_str()).collect();
    let user_locations: Vec<&str> = network.users.iter().map(|u| u.location.as_str()).collect();
    let bios: Vec<&str> = network.users.iter().map(|u| u.bio.as_str()).collect();
    let users = tx
        .timed_execute(
            "INSERT INTO sn.users (user_id, name, email, title, location, bio)
             SELECT * FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[])
             ON CONFLICT DO NOTHING",
            &[&ids, &user_names, &emails, &titles, &user_locations, &bios],
            "seed_users",
        )
        .await?;

    let (skill_users, skill_refs): (Vec<&str>, Vec<&str>) = network
        .users
        .iter()
        .flat_map(|u| u.skills.iter().map(move |s| (u.user_id.as_str(), s.as_str())))
        .unzip();
    let user_skills = tx
        .timed_execute(
            "INSERT INTO sn.user_skills (user_id, skill_name)
             SELECT * FROM UNNEST($1::text[], $2::text[])
             ON CONFLICT DO NOTHING",
            &[&skill_users, &skill_refs],
            "seed_user_skills",
        )
        .await?;

    let employers: Vec<&str> = network.users.iter().map(|u| u.company.as_str()).collect();
    let employments = tx
        .timed_execute(
            "INSERT INTO sn.employment (user_id, company_name)
             SELECT * FROM UNNEST($1::text[], $2::text[])
             ON CONFLICT (user_id) DO NOTHING",
            &[&ids, &employers],
            "seed_employment",
        )
        .await?;

    let (lefts, rights): (Vec<&str>, Vec<&str>) = network
        .connections
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .unzip();
    let connections = tx
        .timed_execute(
            "INSERT INTO sn.connections (user_a, user_b)
             SELECT LEAST(a, b), GREATEST(a, b) FROM UNNEST($1::text[], $2::text[]) AS pairs(a, b)
             ON CONFLICT DO NOTHING",
            &[&lefts, &rights],
            "seed_connections",
        )
        .await?;

    tx.commit().await?;

    let summary = SeedSummary {
        users,
        user_skills,
        employments,
        connections,
    };
    info!(?summary, "seed applied");
    Ok(summary)
}
