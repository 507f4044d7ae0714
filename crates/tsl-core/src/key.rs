//! Public key normalization.
//!
//! Every supported key is reduced to a `(type, format, info, bytes)` tuple
//! whose bytes are canonical: two certificates carrying the same key always
//! produce identical bytes, whatever optional encoding choices their issuers
//! made. Duplicate detection compares on these bytes.
//!
//! | type    | format | info          | bytes                               |
//! |---------|--------|---------------|-------------------------------------|
//! | RSA     | SPKI   | modulus bits  | DER `SubjectPublicKeyInfo`          |
//! | EC      | SEC1   | curve name    | `0x04 ‖ X ‖ Y`, fixed-width coords  |
//! | Ed25519 | RAW    | -             | 32 raw bytes                        |
//! | Ed448   | RAW    | -             | 57 raw bytes                        |

use der::asn1::{AnyRef, BitStringRef};
use der::oid::ObjectIdentifier;
use der::Encode;
use spki::{AlgorithmIdentifierRef, SubjectPublicKeyInfoRef};
use x509_parser::public_key::PublicKey as ParsedKey;
use x509_parser::x509::SubjectPublicKeyInfo;

use crate::error::{Result, TslError};
use crate::types::{KeyType, NormalizedKey};

const RSA_ENCRYPTION: &str = "1.2.840.113549.1.1.1";
const EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";
const ED25519: &str = "1.3.101.112";
const ED448: &str = "1.3.101.113";

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap(RSA_ENCRYPTION);

const ED25519_KEY_LEN: usize = 32;
const ED448_KEY_LEN: usize = 57;

/// A named elliptic curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curve {
    /// SEC 2 / RFC 5639 name
    pub name: &'static str,
    /// Dotted OID of the named curve
    pub oid: &'static str,
    /// Field size in bits
    pub bits: usize,
}

impl Curve {
    /// Byte width of one affine coordinate.
    #[must_use]
    pub const fn coordinate_len(&self) -> usize {
        (self.bits + 7) / 8
    }

    /// Length of the uncompressed SEC1 point.
    #[must_use]
    pub const fn uncompressed_len(&self) -> usize {
        1 + 2 * self.coordinate_len()
    }

    /// Look up a curve by its dotted OID.
    #[must_use]
    pub fn from_oid(oid: &str) -> Option<Self> {
        CURVES.iter().copied().find(|c| c.oid == oid)
    }
}

/// Named curves recognised in EC public keys.
pub const CURVES: &[Curve] = &[
    Curve { name: "secp192r1", oid: "1.2.840.10045.3.1.1", bits: 192 },
    Curve { name: "secp224r1", oid: "1.3.132.0.33", bits: 224 },
    Curve { name: "secp256r1", oid: "1.2.840.10045.3.1.7", bits: 256 },
    Curve { name: "secp384r1", oid: "1.3.132.0.34", bits: 384 },
    Curve { name: "secp521r1", oid: "1.3.132.0.35", bits: 521 },
    Curve { name: "secp256k1", oid: "1.3.132.0.10", bits: 256 },
    Curve { name: "brainpoolP256r1", oid: "1.3.36.3.3.2.8.1.1.7", bits: 256 },
    Curve { name: "brainpoolP384r1", oid: "1.3.36.3.3.2.8.1.1.11", bits: 384 },
    Curve { name: "brainpoolP512r1", oid: "1.3.36.3.3.2.8.1.1.13", bits: 512 },
];

/// A decoded public key, one variant per algorithm family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKeyMaterial<'a> {
    /// RSA modulus and the DER `RSAPublicKey` it came from
    Rsa {
        /// Big-endian modulus, possibly with a sign byte
        modulus: &'a [u8],
        /// DER `RSAPublicKey { modulus, publicExponent }`
        public_key: &'a [u8],
    },
    /// Point on a named curve, in whatever SEC1 form the certificate used
    Ec {
        /// Curve parameters
        curve: Curve,
        /// SEC1-encoded point
        point: &'a [u8],
    },
    /// Raw Ed25519 key
    Ed25519(&'a [u8]),
    /// Raw Ed448 key
    Ed448(&'a [u8]),
    /// Any other algorithm
    Unknown {
        /// Human-readable algorithm description
        algorithm: String,
    },
}

impl<'a> PublicKeyMaterial<'a> {
    /// Decode the key carried by a certificate's `SubjectPublicKeyInfo`.
    pub fn from_spki(spki: &'a SubjectPublicKeyInfo<'_>) -> Result<Self> {
        let algorithm = spki.algorithm.algorithm.to_id_string();
        let key_bytes: &'a [u8] = spki.subject_public_key.data.as_ref();

        match algorithm.as_str() {
            RSA_ENCRYPTION => match spki.parsed() {
                Ok(ParsedKey::RSA(rsa)) => Ok(Self::Rsa {
                    modulus: rsa.modulus,
                    public_key: key_bytes,
                }),
                Ok(_) => Err(TslError::InvalidKey("rsaEncryption key is not RSA".into())),
                Err(e) => Err(TslError::InvalidKey(e.to_string())),
            },
            EC_PUBLIC_KEY => {
                let curve_oid = spki
                    .algorithm
                    .parameters
                    .as_ref()
                    .and_then(|p| p.as_oid().ok())
                    .map(|oid| oid.to_id_string());
                match curve_oid.as_deref().and_then(Curve::from_oid) {
                    Some(curve) => Ok(Self::Ec {
                        curve,
                        point: key_bytes,
                    }),
                    None => Ok(Self::Unknown {
                        algorithm: format!(
                            "EC on curve {}",
                            curve_oid.as_deref().unwrap_or("<implicit>")
                        ),
                    }),
                }
            }
            ED25519 => Ok(Self::Ed25519(key_bytes)),
            ED448 => Ok(Self::Ed448(key_bytes)),
            _ => Ok(Self::Unknown { algorithm }),
        }
    }

    /// Algorithm family of this key.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Rsa { .. } => KeyType::Rsa,
            Self::Ec { .. } => KeyType::Ec,
            Self::Ed25519(_) => KeyType::Ed25519,
            Self::Ed448(_) => KeyType::Ed448,
            Self::Unknown { .. } => KeyType::Unknown,
        }
    }
}

/// Normalize a decoded key into its canonical encoded form.
///
/// # Errors
///
/// `UnsupportedKeyType` for algorithms outside RSA, EC, Ed25519 and Ed448;
/// `InvalidKey` when the key bytes do not match their algorithm.
pub fn normalize(key: &PublicKeyMaterial<'_>) -> Result<NormalizedKey> {
    let key_type = key.key_type();
    let (key_info, encoded) = match key {
        PublicKeyMaterial::Rsa {
            modulus,
            public_key,
        } => {
            let bits = modulus_bits(modulus);
            if bits == 0 {
                return Err(TslError::InvalidKey("RSA modulus is zero".into()));
            }
            (Some(bits.to_string()), rsa_spki_der(public_key)?)
        }
        PublicKeyMaterial::Ec { curve, point } => {
            (Some(curve.name.to_string()), sec1_uncompressed(*curve, point)?)
        }
        PublicKeyMaterial::Ed25519(raw) => (None, raw_key(raw, ED25519_KEY_LEN, key_type)?),
        PublicKeyMaterial::Ed448(raw) => (None, raw_key(raw, ED448_KEY_LEN, key_type)?),
        PublicKeyMaterial::Unknown { algorithm } => {
            return Err(TslError::UnsupportedKeyType {
                algorithm: algorithm.clone(),
            })
        }
    };

    Ok(NormalizedKey {
        key_type,
        key_format: key_type.format(),
        key_info,
        encoded,
    })
}

/// Decode and normalize in one step.
pub fn normalize_spki(spki: &SubjectPublicKeyInfo<'_>) -> Result<NormalizedKey> {
    normalize(&PublicKeyMaterial::from_spki(spki)?)
}

/// Exact bit length of a big-endian unsigned integer.
fn modulus_bits(modulus: &[u8]) -> usize {
    let Some(first) = modulus.iter().position(|&b| b != 0) else {
        return 0;
    };
    let digits = &modulus[first..];
    (digits.len() - 1) * 8 + (8 - digits[0].leading_zeros() as usize)
}

/// Re-encode an RSA key as DER SPKI with `rsaEncryption` and NULL parameters.
fn rsa_spki_der(public_key: &[u8]) -> Result<Vec<u8>> {
    let der_err = |e: der::Error| TslError::InvalidKey(format!("RSA SPKI encoding: {e}"));
    let spki = SubjectPublicKeyInfoRef {
        algorithm: AlgorithmIdentifierRef {
            oid: RSA_ENCRYPTION_OID,
            parameters: Some(AnyRef::NULL),
        },
        subject_public_key: BitStringRef::from_bytes(public_key).map_err(der_err)?,
    };
    spki.to_der().map_err(der_err)
}

fn raw_key(raw: &[u8], expected: usize, key_type: KeyType) -> Result<Vec<u8>> {
    if raw.len() != expected {
        return Err(TslError::InvalidKey(format!(
            "{key_type} key is {} bytes, expected {expected}",
            raw.len()
        )));
    }
    Ok(raw.to_vec())
}

/// Produce `0x04 ‖ X ‖ Y` for any SEC1 point form the certificate may carry.
fn sec1_uncompressed(curve: Curve, point: &[u8]) -> Result<Vec<u8>> {
    let width = curve.coordinate_len();
    match point.first() {
        Some(0x04) if point.len() == curve.uncompressed_len() => {
            let (x, y) = point[1..].split_at(width);
            encode_point(width, x, y)
        }
        Some(0x02 | 0x03) if point.len() == 1 + width => {
            let full = decompress(curve, point)?;
            if full.len() != curve.uncompressed_len() {
                return Err(TslError::InvalidKey(format!(
                    "decompressed {} point has {} bytes",
                    curve.name,
                    full.len()
                )));
            }
            let (x, y) = full[1..].split_at(width);
            encode_point(width, x, y)
        }
        _ => Err(TslError::InvalidKey(format!(
            "malformed {} point of {} bytes",
            curve.name,
            point.len()
        ))),
    }
}

/// Build an uncompressed point from affine coordinates, each left-padded to `width`.
fn encode_point(width: usize, x: &[u8], y: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(1 + 2 * width);
    out.push(0x04);
    push_fixed_width(&mut out, x, width)?;
    push_fixed_width(&mut out, y, width)?;
    Ok(out)
}

fn push_fixed_width(out: &mut Vec<u8>, value: &[u8], width: usize) -> Result<()> {
    let first = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    let digits = &value[first..];
    if digits.len() > width {
        return Err(TslError::InvalidKey(format!(
            "coordinate of {} bytes exceeds {width}",
            digits.len()
        )));
    }
    out.resize(out.len() + width - digits.len(), 0);
    out.extend_from_slice(digits);
    Ok(())
}

/// Expand a compressed SEC1 point with the curve's field arithmetic.
macro_rules! expand_point {
    ($curve:ident, $point:expr, $invalid:expr) => {{
        use $curve::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
        let encoded = $curve::EncodedPoint::from_bytes($point)
            .map_err(|e| TslError::InvalidKey(e.to_string()))?;
        let affine: Option<$curve::AffinePoint> =
            $curve::AffinePoint::from_encoded_point(&encoded).into();
        affine
            .map(|p| p.to_encoded_point(false).as_bytes().to_vec())
            .ok_or_else($invalid)
    }};
}

fn decompress(curve: Curve, point: &[u8]) -> Result<Vec<u8>> {
    let invalid = || TslError::InvalidKey(format!("point is not on {}", curve.name));
    match curve.name {
        "secp256r1" => expand_point!(p256, point, invalid),
        "secp384r1" => expand_point!(p384, point, invalid),
        "secp521r1" => expand_point!(p521, point, invalid),
        other => Err(TslError::UnsupportedKeyType {
            algorithm: format!("compressed point on {other}"),
        }),
    }
}
