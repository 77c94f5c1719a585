use serde::Serialize;

/// An exercise that may be prescribed, with its illustration under `static/images/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogExercise {
    pub name: &'static str,
    pub image: &'static str,
}

pub const EXERCISE_CATALOG: &[CatalogExercise] = &[
    CatalogExercise { name: "Supino Reto", image: "supino_reto.jpg" },
    CatalogExercise { name: "Agachamento Livre", image: "agachamento_livre.jpg" },
    CatalogExercise { name: "Remada Cavalinho", image: "remada_cavalinho.jpg" },
    CatalogExercise { name: "Desenvolvimento Halteres", image: "desenvolvimento_halteres.jpg" },
    CatalogExercise { name: "Cadeira Extensora", image: "cadeira_extensora.jpg" },
    CatalogExercise { name: "Rosca Direta", image: "rosca_direta.jpg" },
];

/// Case-insensitive lookup returning the canonical entry
pub fn find_exercise(name: &str) -> Option<&'static CatalogExercise> {
    let wanted = name.trim();
    EXERCISE_CATALOG
        .iter()
        .find(|exercise| exercise.name.eq_ignore_ascii_case(wanted))
}
