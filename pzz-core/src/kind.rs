//! Payload classification and the chunk tag vocabularies of each payload kind
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};

use crate::{read_u32, ChunkHeader, Chunks, Error, CHUNK_HEADER_SIZE};

const MODEL_MAGIC: u32 = 0x0000_0001;
const SKELETON_MAGIC: u32 = 0xC000_0000;
const ANIMATION_COUNT: u32 = 0x40;
const SHADOW_COUNT: u32 = 0x0005_0000;
const HITS_MAGIC: u32 = 0x5354_4948;

/// Kind of a decompressed archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Model,
    Skeleton,
    Animation,
    ShadowVolume,
    CollisionMesh,
    Unrecognized,
}

impl PayloadKind {
    /// Classify a decompressed payload from its first two words. There is no
    /// magic string; each rule is a value test on the root chunk header.
    pub fn classify(data: &[u8]) -> PayloadKind {
        let (w0, w1) = match (read_u32(data, 0), read_u32(data, 4)) {
            (Ok(w0), Ok(w1)) => (w0, w1),
            _ => return PayloadKind::Unrecognized,
        };

        if w0 == MODEL_MAGIC && w1 > 2 && w1 < 6 {
            PayloadKind::Model
        } else if w0 == SKELETON_MAGIC {
            PayloadKind::Skeleton
        } else if w1 == ANIMATION_COUNT {
            PayloadKind::Animation
        } else if w1 == SHADOW_COUNT {
            PayloadKind::ShadowVolume
        } else if w0 == HITS_MAGIC {
            PayloadKind::CollisionMesh
        } else {
            PayloadKind::Unrecognized
        }
    }

    pub fn is_recognized(&self) -> bool {
        *self != PayloadKind::Unrecognized
    }

    /// Short format name as used by the game's tooling
    pub fn name(&self) -> &'static str {
        match self {
            PayloadKind::Model => "AMO",
            PayloadKind::Skeleton => "AHI",
            PayloadKind::Animation => "AAN",
            PayloadKind::ShadowVolume => "SDT",
            PayloadKind::CollisionMesh => "HITS",
            PayloadKind::Unrecognized => "?",
        }
    }

    /// File extension for an extracted payload of this kind
    pub fn extension(&self) -> &'static str {
        match self {
            PayloadKind::Model => "amo",
            PayloadKind::Skeleton => "ahi",
            PayloadKind::Animation => "aan",
            PayloadKind::ShadowVolume => "sdt",
            PayloadKind::CollisionMesh => "hits",
            PayloadKind::Unrecognized => "bin",
        }
    }

    /// Symbolic name of a chunk tag in this kind's vocabulary
    pub fn tag_name(&self, tag: u32) -> TagName {
        match self {
            PayloadKind::Model => TagName::Model(ModelTag::from_u32(tag)),
            PayloadKind::Skeleton => TagName::Skeleton(SkeletonTag::from_u32(tag)),
            PayloadKind::Animation => TagName::Animation(AnimationTag::from_u32(tag)),
            _ => TagName::Raw(tag),
        }
    }
}

impl Display for PayloadKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

macro_rules! tag_vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident = $value:literal,)+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Unrecognized(u32),
        }

        impl $name {
            pub fn from_u32(value: u32) -> $name {
                match value {
                    $($value => $name::$variant,)+
                    other => $name::Unrecognized(other),
                }
            }

            pub fn as_u32(&self) -> u32 {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unrecognized(other) => *other,
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                match self {
                    $($name::$variant => f.write_str(stringify!($variant)),)+
                    $name::Unrecognized(other) => write!(f, "{:#010x}", other),
                }
            }
        }
    };
}

tag_vocabulary! {
    /// Chunk tags found in model (AMO) payloads
    ModelTag {
        Magic = 0x0000_0001,
        ModelContainer = 0x0000_0002,
        MeshContainer = 0x0000_0004,
        TristripContainer = 0x0000_0005,
        MaterialProperties = 0x0000_0009,
        TextureProperties = 0x0000_000A,
        Unknown = 0x0002_0000,
        Tristrip03 = 0x0003_0000,
        Tristrip04 = 0x0004_0000,
        MaterialList = 0x0005_0000,
        MaterialPerStrip = 0x0006_0000,
        VertexCoordinates = 0x0007_0000,
        VertexNormals = 0x0008_0000,
        VertexUvs = 0x000A_0000,
        VertexColors = 0x000B_0000,
        VertexGroups = 0x000C_0000,
        UnusedUnknown = 0x000E_0000,
        MeshAttributes = 0x000F_0000,
        HitboxIdentifier = 0x0011_0000,
    }
}

tag_vocabulary! {
    /// Chunk tags found in skeleton (AHI) payloads
    SkeletonTag {
        Magic = 0xC000_0000,
        TreeRoot = 0x0000_0000,
        BoneType1 = 0x4000_0001,
        BoneType2 = 0x4000_0002,
    }
}

tag_vocabulary! {
    /// Chunk tags found in animation (AAN) payloads
    AnimationTag {
        Block01 = 0x8000_0001,
        Block02 = 0x8000_0002,
        Header = 0x8000_0000,
        TranslationBlock = 0x8000_01C0,
        TranslationX = 0x8022_0040,
        TranslationY = 0x8022_0080,
        TranslationZ = 0x8022_0100,
        TransShortX = 0x8012_0040,
        TransShortY = 0x8012_0080,
        TransShortZ = 0x8012_0100,
        RotationBlock = 0x8000_0038,
        RotationX = 0x8022_0008,
        RotationY = 0x8022_0010,
        RotationZ = 0x8022_0020,
        RotaShortX = 0x8012_0008,
        RotaShortY = 0x8012_0010,
        RotaShortZ = 0x8012_0020,
    }
}

/// A chunk tag resolved against the vocabulary of one payload kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagName {
    Model(ModelTag),
    Skeleton(SkeletonTag),
    Animation(AnimationTag),
    Raw(u32),
}

impl Display for TagName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TagName::Model(tag) => Display::fmt(tag, f),
            TagName::Skeleton(tag) => Display::fmt(tag, f),
            TagName::Animation(tag) => Display::fmt(tag, f),
            TagName::Raw(tag) => write!(f, "{:#010x}", tag),
        }
    }
}

/// One line of a payload outline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSummary {
    pub offset: usize,
    /// 0 for the root chunk, 1 for its children
    pub depth: usize,
    pub name: TagName,
    pub header: ChunkHeader,
}

/// Root chunk of a payload followed by its immediate children.
///
/// Children start right after the root header and end at the root's size,
/// clamped to the payload length (decompressed payloads may carry padding).
pub fn outline(kind: PayloadKind, data: &[u8]) -> Result<Vec<ChunkSummary>, Error> {
    let root = ChunkHeader::read(data, 0)?;
    let mut summary = Vec::new();
    summary.push(ChunkSummary {
        offset: 0,
        depth: 0,
        name: kind.tag_name(root.tag),
        header: root,
    });

    let end = (root.size as usize).min(data.len());
    for chunk in Chunks::new(data, CHUNK_HEADER_SIZE..end) {
        let (offset, header) = chunk?;
        summary.push(ChunkSummary {
            offset,
            depth: 1,
            name: kind.tag_name(header.tag),
            header,
        });
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::{outline, AnimationTag, ModelTag, PayloadKind, SkeletonTag, TagName};
    use crate::insert_header;
    use crate::test::words;

    #[test]
    fn classify_model() {
        assert_eq!(PayloadKind::classify(&words(&[1, 4])), PayloadKind::Model);
        assert_eq!(PayloadKind::classify(&words(&[1, 3, 0])), PayloadKind::Model);
        assert_eq!(PayloadKind::classify(&words(&[1, 5])), PayloadKind::Model);
    }

    #[test]
    fn classify_model_count_bounds() {
        assert_eq!(
            PayloadKind::classify(&words(&[1, 2])),
            PayloadKind::Unrecognized
        );
        assert_eq!(
            PayloadKind::classify(&words(&[1, 6])),
            PayloadKind::Unrecognized
        );
    }

    #[test]
    fn classify_other_kinds() {
        assert_eq!(
            PayloadKind::classify(&words(&[0xC000_0000, 12])),
            PayloadKind::Skeleton
        );
        assert_eq!(
            PayloadKind::classify(&words(&[0x8000_0000, 0x40])),
            PayloadKind::Animation
        );
        assert_eq!(
            PayloadKind::classify(&words(&[7, 0x5_0000])),
            PayloadKind::ShadowVolume
        );
        assert_eq!(
            PayloadKind::classify(b"HITS\x01\x00\x00\x00"),
            PayloadKind::CollisionMesh
        );
    }

    #[test]
    fn classify_rule_order() {
        // Skeleton magic wins over an animation-like count
        assert_eq!(
            PayloadKind::classify(&words(&[0xC000_0000, 0x40])),
            PayloadKind::Skeleton
        );
    }

    #[test]
    fn classify_short_buffer() {
        assert_eq!(PayloadKind::classify(&[1, 0, 0, 0]), PayloadKind::Unrecognized);
        assert_eq!(PayloadKind::classify(&[]), PayloadKind::Unrecognized);
    }

    #[test]
    fn tag_lookup() {
        assert_eq!(ModelTag::from_u32(0x7_0000), ModelTag::VertexCoordinates);
        assert_eq!(ModelTag::from_u32(0x1234), ModelTag::Unrecognized(0x1234));
        assert_eq!(ModelTag::Unrecognized(0x1234).as_u32(), 0x1234);
        assert_eq!(SkeletonTag::from_u32(0).to_string(), "TreeRoot");
        assert_eq!(AnimationTag::RotaShortZ.as_u32(), 0x8012_0020);
        assert_eq!(
            PayloadKind::Skeleton.tag_name(0xdead).to_string(),
            "0x0000dead"
        );
    }

    #[test]
    fn outline_model() {
        let mut unknown = words(&[0x10B_0900]);
        insert_header(&mut unknown, 0x2_0000, 1);
        let mut models = Vec::new();
        insert_header(&mut models, 0x2, 0);

        let mut data = unknown;
        data.extend_from_slice(&models);
        insert_header(&mut data, 0x1, 2);
        // Trailing padding after the root chunk is ignored
        data.extend_from_slice(&[0; 8]);

        let lines = outline(PayloadKind::Model, &data).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].name, TagName::Model(ModelTag::Magic));
        assert_eq!(lines[0].depth, 0);
        assert_eq!(lines[1].name, TagName::Model(ModelTag::Unknown));
        assert_eq!(lines[1].offset, 12);
        assert_eq!(lines[2].name, TagName::Model(ModelTag::ModelContainer));
        assert_eq!(lines[2].offset, 28);
    }
}
