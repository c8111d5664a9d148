// Static asset table: one entry per displayable model.
//
// All per-model policy (mesh, thumbnail, placement, animation speed and the
// party/base pairing) is looked up here by [`ModelId`] instead of being
// inferred from file names.

use glam::Vec3;

/// Character family, independent of the party variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Gengar,
    Meloetta,
    Lucario,
}

impl Family {
    /// Cyclic navigation order.
    pub const ORDER: [Family; 3] = [Family::Gengar, Family::Meloetta, Family::Lucario];

    fn position(self) -> usize {
        match self {
            Family::Gengar => 0,
            Family::Meloetta => 1,
            Family::Lucario => 2,
        }
    }

    pub fn next(self) -> Family {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Family {
        let n = Self::ORDER.len();
        Self::ORDER[(self.position() + n - 1) % n]
    }

    pub fn base(self) -> ModelId {
        match self {
            Family::Gengar => ModelId::Gengar,
            Family::Meloetta => ModelId::Meloetta,
            Family::Lucario => ModelId::Lucario,
        }
    }

    pub fn party(self) -> ModelId {
        match self {
            Family::Gengar => ModelId::GengarParty,
            Family::Meloetta => ModelId::MeloettaParty,
            Family::Lucario => ModelId::LucarioParty,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelId {
    Gengar,
    GengarParty,
    Meloetta,
    MeloettaParty,
    Lucario,
    LucarioParty,
}

impl ModelId {
    pub const ALL: [ModelId; 6] = [
        ModelId::Gengar,
        ModelId::GengarParty,
        ModelId::Meloetta,
        ModelId::MeloettaParty,
        ModelId::Lucario,
        ModelId::LucarioParty,
    ];

    pub fn family(self) -> Family {
        match self {
            ModelId::Gengar | ModelId::GengarParty => Family::Gengar,
            ModelId::Meloetta | ModelId::MeloettaParty => Family::Meloetta,
            ModelId::Lucario | ModelId::LucarioParty => Family::Lucario,
        }
    }

    pub fn name(self) -> &'static str {
        self.asset().name
    }

    pub fn asset(self) -> &'static ModelAsset {
        asset(self)
    }
}

impl std::fmt::Display for ModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable per-model rendering parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelAsset {
    pub id: ModelId,
    pub name: &'static str,
    pub mesh_path: &'static str,
    pub thumbnail_path: &'static str,
    pub position: Vec3,
    pub scale: f32,
    /// Time scale applied to every animation clip bundled with the mesh.
    pub animation_speed: f32,
}

const GENGAR_POSITION: Vec3 = Vec3::ZERO;
const MELOETTA_POSITION: Vec3 = Vec3::ZERO;
const LUCARIO_POSITION: Vec3 = Vec3::new(0.0, -0.5, 0.0);

static ASSETS: [ModelAsset; 6] = [
    ModelAsset {
        id: ModelId::Gengar,
        name: "gengar",
        mesh_path: "gengar.glb",
        thumbnail_path: "gengar.png",
        position: GENGAR_POSITION,
        scale: 0.7,
        animation_speed: 0.7,
    },
    ModelAsset {
        id: ModelId::GengarParty,
        name: "gengar-party",
        mesh_path: "gengar2.glb",
        thumbnail_path: "gengar.png",
        position: GENGAR_POSITION,
        scale: 0.7,
        animation_speed: 0.7,
    },
    ModelAsset {
        id: ModelId::Meloetta,
        name: "meloetta",
        mesh_path: "meloetta.glb",
        thumbnail_path: "meloetta.png",
        position: MELOETTA_POSITION,
        scale: 1.3,
        animation_speed: 0.3,
    },
    // Meloetta is the only family with a distinct party thumbnail.
    ModelAsset {
        id: ModelId::MeloettaParty,
        name: "meloetta-party",
        mesh_path: "meloetta2.glb",
        thumbnail_path: "meloetta2.png",
        position: MELOETTA_POSITION,
        scale: 1.3,
        animation_speed: 0.3,
    },
    ModelAsset {
        id: ModelId::Lucario,
        name: "lucario",
        mesh_path: "lucario.glb",
        thumbnail_path: "lucario.png",
        position: LUCARIO_POSITION,
        scale: 1.0,
        animation_speed: 0.7,
    },
    ModelAsset {
        id: ModelId::LucarioParty,
        name: "lucario-party",
        mesh_path: "lucario2.glb",
        thumbnail_path: "lucario.png",
        position: LUCARIO_POSITION,
        scale: 1.0,
        animation_speed: 0.7,
    },
];

pub fn asset(id: ModelId) -> &'static ModelAsset {
    let index = match id {
        ModelId::Gengar => 0,
        ModelId::GengarParty => 1,
        ModelId::Meloetta => 2,
        ModelId::MeloettaParty => 3,
        ModelId::Lucario => 4,
        ModelId::LucarioParty => 5,
    };
    &ASSETS[index]
}

