/// A top-level menu category and the POS department group it collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    pub group_id: &'static str,
}

/// Level-1 menu categories, in display order.
pub const CATEGORIES: [Category; 9] = [
    Category {
        name: "Aquarium",
        group_id: "d64323da-f13b-409e-84c6-a92921c62dd8",
    },
    Category {
        name: "Birds",
        group_id: "422687da-6d95-47d2-88b5-924650c5ad30",
    },
    Category {
        name: "Cat",
        group_id: "7b017cc9-100a-4eeb-88be-f744683695ae",
    },
    Category {
        name: "Dog",
        group_id: "4e9f4017-d7d6-4bc6-b433-6a649ef804d2",
    },
    Category {
        name: "Gardening",
        group_id: "ff114529-bf9d-4990-9f8d-c4d8a3f4c501",
    },
    Category {
        name: "Ponds",
        group_id: "9e11904f-e255-45a3-b233-6f605d45692c",
    },
    Category {
        name: "POULTRY",
        group_id: "f82a1edc-5128-4a48-9be2-b47422995291",
    },
    Category {
        name: "Small Animals",
        group_id: "c891aae3-01f3-427d-9011-d878ce6635ca",
    },
    Category {
        name: "STOCKFEED",
        group_id: "27ec004b-1de3-499a-a696-e39b318d3215",
    },
];
