//! String forms for distinguished names and signature algorithms
//!
//! Names render RFC 2253 style: attributes are grouped into a fixed order
//! (C, ST, L, STREET, POSTALCODE, O, OU, CN, SERIALNUMBER), emitted last to
//! first and joined with `,` without spaces. Values of the same attribute
//! share one multi-valued RDN (`O=a+O=b`). Attributes outside that set come
//! last as `<oid>=#<hex DER>`.

use x509_parser::certificate::X509Certificate;
use x509_parser::x509::X509Name;

const STANDARD_ATTRIBUTES: [(&str, &str); 9] = [
    ("2.5.4.6", "C"),
    ("2.5.4.8", "ST"),
    ("2.5.4.7", "L"),
    ("2.5.4.9", "STREET"),
    ("2.5.4.17", "POSTALCODE"),
    ("2.5.4.10", "O"),
    ("2.5.4.11", "OU"),
    ("2.5.4.3", "CN"),
    ("2.5.4.5", "SERIALNUMBER"),
];

/// Only the last value of these is kept
const SINGLE_VALUED: [&str; 2] = ["2.5.4.3", "2.5.4.5"];

const TAG_UTF8_STRING: u8 = 0x0c;
const TAG_PRINTABLE_STRING: u8 = 0x13;

const OID_RSASSA_PSS: &str = "1.2.840.113549.1.1.10";
/// 2.16.840.1.101.3.4.2, the SHA-2 hash arc
const SHA2_OID_PREFIX: [u8; 8] = [0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02];

pub(crate) fn distinguished_name(name: &X509Name<'_>) -> String {
    let mut standard: Vec<Vec<String>> = vec![Vec::new(); STANDARD_ATTRIBUTES.len()];
    let mut extra = Vec::new();

    for atv in name.iter_attributes() {
        let oid = atv.attr_type().to_id_string();
        // Non-string values have no textual form
        let Ok(value) = atv.as_str() else {
            continue;
        };

        match STANDARD_ATTRIBUTES.iter().position(|(id, _)| *id == oid) {
            Some(slot) => {
                if SINGLE_VALUED.contains(&oid.as_str()) {
                    standard[slot].clear();
                }
                standard[slot].push(value.to_string());
            }
            None => extra.push(format!("{oid}=#{}", hex::encode(der_string(value)))),
        }
    }

    let mut rdns: Vec<String> = standard
        .iter()
        .zip(STANDARD_ATTRIBUTES.iter())
        .rev()
        .filter(|(values, _)| !values.is_empty())
        .map(|(values, (_, short))| {
            values
                .iter()
                .map(|v| format!("{short}={}", escape_value(v)))
                .collect::<Vec<_>>()
                .join("+")
        })
        .collect();
    rdns.extend(extra.into_iter().rev());
    rdns.join(",")
}

/// `SHA256-RSA` style name, dotted OID when the algorithm has none
pub(crate) fn signature_algorithm(x509: &X509Certificate<'_>) -> String {
    let alg = &x509.signature_algorithm;
    let oid = alg.algorithm.to_id_string();

    let name = match oid.as_str() {
        "1.2.840.113549.1.1.2" => Some("MD2-RSA"),
        "1.2.840.113549.1.1.4" => Some("MD5-RSA"),
        "1.2.840.113549.1.1.5" | "1.3.14.3.2.29" => Some("SHA1-RSA"),
        "1.2.840.113549.1.1.11" => Some("SHA256-RSA"),
        "1.2.840.113549.1.1.12" => Some("SHA384-RSA"),
        "1.2.840.113549.1.1.13" => Some("SHA512-RSA"),
        OID_RSASSA_PSS => alg
            .parameters
            .as_ref()
            .and_then(|params| pss_name(params.as_bytes())),
        "1.2.840.10040.4.3" => Some("DSA-SHA1"),
        "2.16.840.1.101.3.4.3.2" => Some("DSA-SHA256"),
        "1.2.840.10045.4.1" => Some("ECDSA-SHA1"),
        "1.2.840.10045.4.3.2" => Some("ECDSA-SHA256"),
        "1.2.840.10045.4.3.3" => Some("ECDSA-SHA384"),
        "1.2.840.10045.4.3.4" => Some("ECDSA-SHA512"),
        "1.3.101.112" => Some("Ed25519"),
        _ => None,
    };

    match name {
        Some(name) => name.to_string(),
        None => oid,
    }
}

/// PSS names carry the hash from the parameters; SHA-1 PSS has no name
fn pss_name(params: &[u8]) -> Option<&'static str> {
    let pos = params
        .windows(SHA2_OID_PREFIX.len())
        .position(|w| w == SHA2_OID_PREFIX.as_slice())?;
    match params.get(pos + SHA2_OID_PREFIX.len())? {
        1 => Some("SHA256-RSAPSS"),
        2 => Some("SHA384-RSAPSS"),
        3 => Some("SHA512-RSAPSS"),
        _ => None,
    }
}

fn escape_value(value: &str) -> String {
    let last = value.len().saturating_sub(1);
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        let escape = match c {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' => true,
            ' ' => i == 0 || i == last,
            '#' => i == 0,
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// PrintableString when the charset allows it, UTF8String otherwise
fn der_string(value: &str) -> Vec<u8> {
    let tag = if value.bytes().all(is_printable) {
        TAG_PRINTABLE_STRING
    } else {
        TAG_UTF8_STRING
    };

    let mut out = vec![tag];
    let len = value.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let bytes = len.to_be_bytes();
        let skip = bytes.iter().take_while(|b| **b == 0).count();
        out.push(0x80 | (bytes.len() - skip) as u8);
        out.extend_from_slice(&bytes[skip..]);
    }
    out.extend_from_slice(value.as_bytes());
    out
}

fn is_printable(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}
