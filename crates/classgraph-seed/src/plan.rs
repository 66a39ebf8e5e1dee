//! The classroom seed plan.
//!
//! Seven node loads (one CSV file per label) followed by five relationship
//! statements driven by `Equipement.csv`. Every statement uses MERGE for the
//! nodes it touches, so re-running a node load is idempotent. The
//! relationship statements use CREATE for most edges and will duplicate them
//! on a second run.

use serde::Serialize;

use crate::error::{Result, SeedError};

/// What a seed step does to the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    NodeLoad,
    Relationship,
}

/// One named bootstrap statement.
#[derive(Debug, Clone, Serialize)]
pub struct SeedStep {
    pub name: String,
    pub kind: StepKind,
    pub cypher: String,
}

/// An ordered list of seed steps bound to one database.
#[derive(Debug, Clone, Serialize)]
pub struct SeedPlan {
    pub database: String,
    pub steps: Vec<SeedStep>,
}

/// A `LOAD CSV ... MERGE ... ON CREATE SET` statement for one label.
struct NodeLoad {
    step: &'static str,
    file: &'static str,
    label: &'static str,
    var: &'static str,
    key: &'static str,
    key_column: &'static str,
    property: &'static str,
    column: &'static str,
}

const NODE_LOADS: &[NodeLoad] = &[
    NodeLoad {
        step: "load-tables",
        file: "Tables.csv",
        label: "Tables",
        var: "table",
        key: "tableId",
        key_column: "TableId",
        property: "tableName",
        column: "TableName",
    },
    NodeLoad {
        step: "load-chairs",
        file: "Chairs.csv",
        label: "Chairs",
        var: "chair",
        key: "chairId",
        key_column: "ChairID",
        property: "chairName",
        column: "ChairName",
    },
    NodeLoad {
        step: "load-windows",
        file: "Window.csv",
        label: "Window",
        var: "window",
        key: "windowId",
        key_column: "WindowID",
        property: "windowName",
        column: "WindowName",
    },
    NodeLoad {
        step: "load-desks",
        file: "Desk.csv",
        label: "Desk",
        var: "desk",
        key: "deskId",
        key_column: "DeskId",
        property: "deskName",
        column: "DeskName",
    },
    NodeLoad {
        step: "load-chalk",
        file: "Chalk.csv",
        label: "Chalk",
        var: "chalk",
        key: "chalkId",
        key_column: "ChalkID",
        property: "chalkName",
        column: "ChalkName",
    },
    NodeLoad {
        step: "load-doors",
        file: "Door.csv",
        label: "Door",
        var: "door",
        key: "doorId",
        key_column: "DoorID",
        property: "doorName",
        column: "DoorName",
    },
    NodeLoad {
        step: "load-classes",
        file: "Class.csv",
        label: "Class",
        var: "class",
        key: "classId",
        key_column: "ClassId",
        property: "classNumber",
        column: "ClassNumber",
    },
];

/// File every relationship step reads.
const EQUIPMENT_FILE: &str = "Equipement.csv";

impl NodeLoad {
    fn render(&self, base_url: &str) -> String {
        let Self {
            file,
            label,
            var,
            key,
            key_column,
            property,
            column,
            ..
        } = self;
        format!(
            "LOAD CSV WITH HEADERS FROM '{url}' AS line FIELDTERMINATOR ','
MERGE ({var}:{label} {{{key}: line.{key_column}}})
  ON CREATE SET {var}.{property} = line.{column}",
            url = csv_url(base_url, file),
        )
    }
}

fn csv_url(base_url: &str, file: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), file)
}

fn relationship_steps(equipment_url: &str) -> Vec<(&'static str, String)> {
    let load = format!("LOAD CSV WITH HEADERS FROM '{equipment_url}' AS line");
    vec![
        (
            "link-tables-chairs-to-class",
            format!(
                "{load}
MATCH (class:Class {{classId: line.ClassId}})
UNWIND range(1, 10) AS tableNumber
MERGE (table:Tables {{tableId: toString(tableNumber)}})
MERGE (chair:Chairs {{chairId: toString(tableNumber)}})
CREATE (table)-[:IS_IN]->(class)
CREATE (chair)-[:IS_IN]->(class)
WITH collect(table) AS tables
FOREACH (i IN range(0, size(tables) - 2) |
  FOREACH (table1 IN [tables[i]] |
    FOREACH (table2 IN [tables[i + 1]] |
      CREATE (table1)-[:ON_THE_LEFT]->(table2)
    )
  )
)"
            ),
        ),
        (
            "link-window-desk-door",
            format!(
                "{load}
MATCH (door:Door {{doorId: line.DoorID}})
MERGE (window1:Window {{windowId: '1'}})
MERGE (desk:Desk {{deskId: '1'}})
CREATE (window1)-[:ON_THE_RIGHT]->(door)<-[:ON_THE_LEFT]-(desk)"
            ),
        ),
        (
            "link-chalk-window-desk",
            format!(
                "{load}
MATCH (desk:Desk {{deskId: line.DeskId}})
MERGE (chalk:Chalk {{chalkId: '1'}})
MERGE (window2:Window {{windowId: '2'}})
CREATE (chalk)-[:ON]->(desk)<-[:ON_THE_LEFT]-(window2)"
            ),
        ),
        (
            "link-desk-to-class",
            format!(
                "{load}
MATCH (class:Class {{classId: line.ClassId}})
MERGE (desk:Desk {{deskId: '1'}})
CREATE (desk)-[:IS_IN]->(class)"
            ),
        ),
        (
            "link-chairs-behind-tables",
            format!(
                "{load}
MATCH (table:Tables)
MATCH (chair:Chairs)
WHERE table.tableId = chair.chairId
MERGE (chair)-[:BEHIND]->(table)"
            ),
        ),
    ]
}

impl SeedPlan {
    /// The full classroom plan, reading CSV files from `base_url`.
    pub fn classroom(base_url: &str, database: &str) -> Self {
        let mut steps: Vec<SeedStep> = NODE_LOADS
            .iter()
            .map(|load| SeedStep {
                name: load.step.to_string(),
                kind: StepKind::NodeLoad,
                cypher: load.render(base_url),
            })
            .collect();

        let equipment_url = csv_url(base_url, EQUIPMENT_FILE);
        steps.extend(
            relationship_steps(&equipment_url)
                .into_iter()
                .map(|(name, cypher)| SeedStep {
                    name: name.to_string(),
                    kind: StepKind::Relationship,
                    cypher,
                }),
        );

        Self {
            database: database.to_string(),
            steps,
        }
    }

    /// Keep only the named steps, in plan order. An empty selection keeps everything.
    pub fn select(&self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self.clone());
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.steps.iter().any(|s| &s.name == *name))
        {
            return Err(SeedError::UnknownStep(unknown.clone()));
        }

        let steps = self
            .steps
            .iter()
            .filter(|s| names.contains(&s.name))
            .cloned()
            .collect();
        Ok(Self {
            database: self.database.clone(),
            steps,
        })
    }

    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
