//! Block materials and the immutable material registry
//!
//! Materials are identified by a single byte; id 0 is always air. The
//! registry is built once at startup and injected into the generator and
//! mesher instead of living in global state.

/// Identifier of a block material. At most 256 distinct materials exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u8);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const BEDROCK: BlockId = BlockId(1);
    pub const STONE: BlockId = BlockId(2);
    pub const DIRT: BlockId = BlockId(3);
    pub const GRASS: BlockId = BlockId(4);
    pub const SAND: BlockId = BlockId(5);
    pub const WATER: BlockId = BlockId(6);
    pub const COAL_ORE: BlockId = BlockId(7);
    pub const IRON_ORE: BlockId = BlockId(8);

    pub fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl From<u8> for BlockId {
    fn from(raw: u8) -> Self {
        BlockId(raw)
    }
}

/// How a material participates in face culling.
///
/// Faces are emitted only across a transparency-class boundary, so two
/// adjacent stone blocks share no face and neither do two water blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transparency {
    /// Not rendered and never occludes (air)
    Empty,
    /// Fully occludes neighboring faces
    Opaque,
    /// Rendered in the transparent pass, occludes only its own class
    Transparent,
}

/// Static properties of a single material
#[derive(Clone, Debug)]
pub struct Material {
    pub id: BlockId,
    pub name: &'static str,
    pub transparency: Transparency,
    /// Texture-array layer the renderer binds for this material
    pub texture_layer: u32,
    /// Whether players may break or replace this block
    pub breakable: bool,
    /// Item id a broken block turns into, if any
    pub drop_item: Option<BlockId>,
}

impl Material {
    /// A solid block takes part in collision and occlusion queries
    pub fn is_solid(&self) -> bool {
        self.transparency != Transparency::Empty
    }
}

/// Immutable lookup table of all known materials, indexed by block id.
///
/// Unknown ids resolve to air so corrupt data degrades to holes instead of
/// panics.
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    /// Build the standard material set
    pub fn standard() -> Self {
        let materials = vec![
            Material {
                id: BlockId::AIR,
                name: "air",
                transparency: Transparency::Empty,
                texture_layer: 0,
                breakable: false,
                drop_item: None,
            },
            Material {
                id: BlockId::BEDROCK,
                name: "bedrock",
                transparency: Transparency::Opaque,
                texture_layer: 1,
                breakable: false,
                drop_item: None,
            },
            Material {
                id: BlockId::STONE,
                name: "stone",
                transparency: Transparency::Opaque,
                texture_layer: 2,
                breakable: true,
                drop_item: Some(BlockId::STONE),
            },
            Material {
                id: BlockId::DIRT,
                name: "dirt",
                transparency: Transparency::Opaque,
                texture_layer: 3,
                breakable: true,
                drop_item: Some(BlockId::DIRT),
            },
            Material {
                id: BlockId::GRASS,
                name: "grass",
                transparency: Transparency::Opaque,
                texture_layer: 4,
                breakable: true,
                drop_item: Some(BlockId::DIRT),
            },
            Material {
                id: BlockId::SAND,
                name: "sand",
                transparency: Transparency::Opaque,
                texture_layer: 5,
                breakable: true,
                drop_item: Some(BlockId::SAND),
            },
            Material {
                id: BlockId::WATER,
                name: "water",
                transparency: Transparency::Transparent,
                texture_layer: 6,
                breakable: false,
                drop_item: None,
            },
            Material {
                id: BlockId::COAL_ORE,
                name: "coal_ore",
                transparency: Transparency::Opaque,
                texture_layer: 7,
                breakable: true,
                drop_item: Some(BlockId::COAL_ORE),
            },
            Material {
                id: BlockId::IRON_ORE,
                name: "iron_ore",
                transparency: Transparency::Opaque,
                texture_layer: 8,
                breakable: true,
                drop_item: Some(BlockId::IRON_ORE),
            },
        ];

        debug_assert!(
            materials.iter().enumerate().all(|(i, m)| m.id.0 as usize == i),
            "registry must be indexed by block id"
        );

        Self { materials }
    }

    /// Look up a material by id; unknown ids resolve to air
    pub fn get(&self, id: BlockId) -> &Material {
        self.materials.get(id.0 as usize).unwrap_or(&self.materials[0])
    }

    /// Number of registered materials
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Exact name lookup
    pub fn by_name(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Case-insensitive linear scan, used by the legacy save-file adapter
    pub fn by_name_ignore_case(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_solid()
    }

    pub fn transparency(&self, id: BlockId) -> Transparency {
        self.get(id).transparency
    }
}
