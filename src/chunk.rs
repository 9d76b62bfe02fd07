use crate::error::{Error, Result};
use alloc::vec;
use alloc::vec::Vec;
use core::convert::TryInto;
use log::trace;

/// Deepest `LIST` nesting accepted below the root chunk.
const MAX_NESTING: usize = 16;

/// RIFF chunks are tagged with 4 byte identifiers.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum ChunkTag {
    /// Root level "chunk"
    Riff,
    /// Nested container, holds a form type followed by sub chunks
    List,
    /// File identifier, the form type of the root chunk of a WAV file
    Wave,
    /// Mandatory chunk for WAV files, contains data such as the sample rate, bit depth, and number of channels.
    Fmt,
    /// Number of sample frames, optional for PCM files.
    Fact,
    /// Mandatory chunk for WAV files, contains the (interleaved) samples.
    Data,
    /// Per channel peak amplitude and position.
    Peak,
    /// Unknown/unhandled chunk tag, kept verbatim.
    Unknown([u8; 4]),
}

impl ChunkTag {
    /// Map a raw four character code onto a tag.
    pub fn from_bytes(bytes: &[u8; 4]) -> Self {
        match bytes {
            [b'R', b'I', b'F', b'F'] => ChunkTag::Riff,
            [b'L', b'I', b'S', b'T'] => ChunkTag::List,
            [b'W', b'A', b'V', b'E'] => ChunkTag::Wave,
            [b'f', b'm', b't', b' '] => ChunkTag::Fmt,
            [b'f', b'a', b'c', b't'] => ChunkTag::Fact,
            [b'd', b'a', b't', b'a'] => ChunkTag::Data,
            [b'P', b'E', b'A', b'K'] => ChunkTag::Peak,
            _ => ChunkTag::Unknown(*bytes),
        }
    }

    /// The four character code as written to disk.
    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkTag::Riff => *b"RIFF",
            ChunkTag::List => *b"LIST",
            ChunkTag::Wave => *b"WAVE",
            ChunkTag::Fmt => *b"fmt ",
            ChunkTag::Fact => *b"fact",
            ChunkTag::Data => *b"data",
            ChunkTag::Peak => *b"PEAK",
            ChunkTag::Unknown(bytes) => bytes,
        }
    }
}

/// Resource Interchange File Format (RIFF) chunk tree.
///
/// `RIFF` and `LIST` chunks are containers carrying a form type and sub chunks,
/// every other chunk is a leaf holding its raw payload.
#[derive(Debug, PartialEq, Clone)]
pub enum Chunk {
    /// Container chunk
    List {
        /// Container tag, `RIFF` or `LIST`
        id: ChunkTag,
        /// Form type, e.g. `WAVE` for the root of a WAV file
        form: ChunkTag,
        /// Sub chunks in stream order
        children: Vec<Chunk>,
    },
    /// Chunk with a raw payload
    Leaf {
        /// Chunk tag
        id: ChunkTag,
        /// Raw bytes for parsing based on the associated tag, without padding.
        bytes: Vec<u8>,
    },
}

impl Chunk {
    /// Create a leaf chunk.
    pub fn leaf(id: ChunkTag, bytes: Vec<u8>) -> Self {
        Chunk::Leaf { id, bytes }
    }

    /// Tag of this chunk.
    pub fn id(&self) -> ChunkTag {
        match self {
            Chunk::List { id, .. } | Chunk::Leaf { id, .. } => *id,
        }
    }

    /// Payload of a leaf chunk, `None` for containers.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Chunk::Leaf { bytes, .. } => Some(bytes),
            Chunk::List { .. } => None,
        }
    }

    /// Sub chunks of a container, empty for leaves.
    pub fn children(&self) -> &[Chunk] {
        match self {
            Chunk::List { children, .. } => children,
            Chunk::Leaf { .. } => &[],
        }
    }

    /// Parse a single chunk at the start of `bytes`, returning it together with
    /// the number of bytes it occupies including the padding byte. `depth`
    /// counts the containers enclosing this chunk.
    pub(crate) fn from_bytes(bytes: &[u8], depth: usize) -> Result<(Self, usize)> {
        let id = read_tag(bytes, 0).map(|b| ChunkTag::from_bytes(&b))?;
        let size = read_u32(bytes, 4)? as usize;

        let end = 8usize
            .checked_add(size)
            .filter(|end| *end <= bytes.len())
            .ok_or(Error::MalformedContainer("chunk size exceeds enclosing data"))?;
        let body = &bytes[8..end];

        let chunk = match id {
            ChunkTag::Riff | ChunkTag::List => {
                if depth > MAX_NESTING {
                    return Err(Error::MalformedContainer("LIST nesting too deep"));
                }

                let form = read_tag(body, 0)
                    .map_err(|_| Error::MalformedContainer("container shorter than its form type"))?;

                Chunk::List {
                    id,
                    form: ChunkTag::from_bytes(&form),
                    children: parse_children(&body[4..], depth + 1)?,
                }
            }
            _ => Chunk::leaf(id, body.to_vec()),
        };

        trace!("parsed {:?} chunk with {} byte payload", id, size);

        // Chunks should always have an even number of bytes,
        // if it is odd there is an empty padding byte at the end.
        // Some writers drop the padding of the final chunk.
        let consumed = (end + (size & 1)).min(bytes.len());

        Ok((chunk, consumed))
    }

    fn payload_len(&self) -> usize {
        match self {
            Chunk::List { children, .. } => {
                4 + children.iter().map(Chunk::encoded_len).sum::<usize>()
            }
            Chunk::Leaf { bytes, .. } => bytes.len(),
        }
    }

    fn encoded_len(&self) -> usize {
        let len = self.payload_len();
        8 + len + (len & 1)
    }

    pub(crate) fn write_into(&self, out: &mut Vec<u8>) -> Result<()> {
        let len = self.payload_len();
        let size: u32 = len
            .try_into()
            .map_err(|_| Error::MalformedContainer("chunk too large for a 32 bit size field"))?;

        out.extend_from_slice(&self.id().to_bytes());
        out.extend_from_slice(&size.to_le_bytes());

        match self {
            Chunk::List { form, children, .. } => {
                out.extend_from_slice(&form.to_bytes());

                for child in children {
                    child.write_into(out)?;
                }
            }
            Chunk::Leaf { bytes, .. } => {
                out.extend_from_slice(bytes);

                if len & 1 == 1 {
                    out.push(0);
                }
            }
        }

        trace!("wrote {:?} chunk with {} byte payload", self.id(), len);

        Ok(())
    }
}

fn read_tag(bytes: &[u8], at: usize) -> Result<[u8; 4]> {
    bytes
        .get(at..at + 4)
        .and_then(|b| b.try_into().ok())
        .ok_or(Error::MalformedContainer("truncated chunk header"))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32> {
    read_tag(bytes, at).map(u32::from_le_bytes)
}

fn parse_children(bytes: &[u8], depth: usize) -> Result<Vec<Chunk>> {
    let mut children = vec![];
    let mut index = 0;

    while index < bytes.len() {
        let (chunk, consumed) = Chunk::from_bytes(&bytes[index..], depth)?;
        index += consumed;
        children.push(chunk);
    }

    Ok(children)
}

/// Parse a byte stream into its RIFF chunk tree.
///
/// The root must be a `RIFF` container; anything after it is ignored.
pub fn parse_riff(bytes: &[u8]) -> Result<Chunk> {
    if read_tag(bytes, 0)? != ChunkTag::Riff.to_bytes() {
        return Err(Error::MalformedContainer("root chunk is not RIFF"));
    }

    let (root, _) = Chunk::from_bytes(bytes, 0)?;

    Ok(root)
}

/// Serialize a RIFF chunk tree, the inverse of [`parse_riff`].
pub fn serialize_riff(root: &Chunk) -> Result<Vec<u8>> {
    match root {
        Chunk::List {
            id: ChunkTag::Riff,
            ..
        } => {
            let mut bytes = Vec::with_capacity(root.encoded_len());
            root.write_into(&mut bytes)?;
            Ok(bytes)
        }
        _ => Err(Error::MalformedContainer("root chunk is not RIFF")),
    }
}
