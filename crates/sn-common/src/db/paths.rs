use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument};

use crate::api::PathNode;
use crate::db::util::TimedClientExt;
use crate::db::{PgPool, db_error};

db_error!(PathQueryError {});

/// Shortest undirected path between two users, searched level by level up to
/// `max_depth` hops. Neighbours are visited in id order, so the chosen path is
/// stable across runs. Returns `None` for unknown users or no path in range.
#[instrument(skip(pool))]
pub async fn fetch_shortest_path(
    pool: &PgPool,
    from: &str,
    to: &str,
    max_depth: usize,
) -> Result<Option<Vec<PathNode>>, PathQueryError> {
    let client = pool.get().await?;

    let endpoints = vec![from.to_string(), to.to_string()];
    let known: i64 = client
        .timed_query_one(
            "SELECT COUNT(DISTINCT user_id) FROM sn.users WHERE user_id = ANY($1)",
            &[&endpoints],
            "shortest_path_endpoints",
        )
        .await?
        .get(0);
    let expected = if from == to { 1 } else { 2 };
    if known < expected {
        return Ok(None);
    }

    let mut parents: HashMap<String, String> = HashMap::from([(from.to_string(), from.to_string())]);
    let mut frontier = vec![from.to_string()];
    let mut found = from == to;

    for depth in 0..max_depth {
        if found || frontier.is_empty() {
            break;
        }

        let rows = client
            .timed_query(
                "SELECT src, dst FROM sn.knows WHERE src = ANY($1) ORDER BY src, dst",
                &[&frontier],
                "shortest_path_expand",
            )
            .await?;
        let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in rows {
            adjacency.entry(row.get("src")).or_default().push(row.get("dst"));
        }

        let mut next = Vec::new();
        'expand: for current in &frontier {
            for neighbour in adjacency.remove(current).unwrap_or_default() {
                if parents.contains_key(&neighbour) {
                    continue;
                }
                parents.insert(neighbour.clone(), current.clone());
                if neighbour == to {
                    found = true;
                    break 'expand;
                }
                next.push(neighbour);
            }
        }
        debug!(depth = depth + 1, frontier = next.len(), "expanded path frontier");
        frontier = next;
    }

    if !found {
        return Ok(None);
    }

    let mut ids = vec![to.to_string()];
    let mut cursor = to.to_string();
    while cursor != from {
        match parents.get(&cursor) {
            Some(parent) => {
                cursor = parent.clone();
                ids.push(cursor.clone());
            }
            None => break,
        }
    }
    ids.reverse();

    let rows = client
        .timed_query(
            "SELECT u.user_id, u.name, u.title, e.company_name AS company
             FROM sn.users u
             LEFT JOIN sn.employment e ON e.user_id = u.user_id
             WHERE u.user_id = ANY($1)",
            &[&ids],
            "shortest_path_nodes",
        )
        .await?;
    let mut nodes: HashMap<String, PathNode> = rows
        .into_iter()
        .map(|row| {
            let node = PathNode {
                user_id: row.get("user_id"),
                name: row.get("name"),
                title: row.get("title"),
                company: row.get("company"),
            };
            (node.user_id.clone(), node)
        })
        .collect();

    Ok(Some(ids.iter().filter_map(|id| nodes.remove(id)).collect()))
}
