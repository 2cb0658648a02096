//! # Offer and Verification Requestor
//!
//! Asks the upstream issuer to mint credential offers and the upstream
//! verifier to create verification requests. No local state is changed.

use anyhow::Context as _;
use serde_json::{Map, Value, json};

use crate::error::{Error, server};
use crate::identity::IssuerIdentity;
use crate::provider::{
    Catalog, IssuerRegistry, IssuerService, VerificationRequest, VerifierService,
};
use crate::types::{CredentialDefinition, CredentialFormat};

/// Request a credential offer for `credential_type` from the upstream
/// issuer. Returns the offer URI exactly as the issuer returned it.
///
/// # Errors
///
/// Returns `Error::UnsupportedCredentialType` when the catalog does not hold
/// the credential type, `Error::NotFound` when the credential's issuer has no
/// registered identity, and `Error::Upstream` when the issuer rejects the
/// request.
pub async fn request_issuance_offer<P>(provider: &P, credential_type: &str) -> Result<String, Error>
where
    P: Catalog + IssuerRegistry + IssuerService,
{
    let Some(definition) =
        Catalog::credential(provider, credential_type).await.context("fetching credential")?
    else {
        return Err(Error::UnsupportedCredentialType(format!(
            "credential type {credential_type} not supported"
        )));
    };

    let issuer_name = &definition.issuer.name;
    let Some(identity) = IssuerRegistry::resolve_issuer_identity(provider, issuer_name)
        .await
        .context("resolving issuer identity")?
    else {
        return Err(Error::NotFound(format!("Issuer DID not found for {issuer_name}")));
    };

    let mapping = Catalog::mapping(provider, credential_type).await.context("fetching mapping")?;
    let vc_id = uuid::Uuid::new_v4().to_string();
    let payload = issuance_payload(&definition, &identity, mapping, &vc_id)?;

    tracing::debug!("requesting {credential_type} offer from {issuer_name}");
    let offer_uri = IssuerService::issue(provider, definition.selected_format, &payload)
        .await
        .context("requesting credential offer")?;
    Ok(offer_uri)
}

/// Build the upstream issuance payload for a catalog credential.
///
/// The credential template is copied with its `id` replaced by `vc_id`. The
/// issuer's key is embedded as a JSON string. For `SD-JWT + VCDM`, every
/// string-valued top-level claim of `credentialSubject` is marked as
/// selectively disclosable.
///
/// # Errors
///
/// Returns `Error::ServerError` if the credential template is not a JSON
/// object.
pub fn issuance_payload(
    definition: &CredentialDefinition, identity: &IssuerIdentity, mapping: Option<Value>,
    vc_id: &str,
) -> Result<Value, Error> {
    let Value::Object(mut vc) = definition.offer.clone() else {
        return Err(server!("credential {} template is not an object", definition.id));
    };
    vc.insert("id".to_string(), Value::String(vc_id.to_string()));

    let mut payload = json!({
        "issuerDid": identity.did,
        "issuanceKey": {
            "type": "local",
            "jwk": identity.jwk.to_string()
        },
    });

    if definition.selected_format == CredentialFormat::SdJwtVcdm {
        let fields = vc
            .get("credentialSubject")
            .and_then(Value::as_object)
            .map(|subject| {
                subject
                    .iter()
                    .filter(|(_, v)| v.is_string())
                    .map(|(k, _)| (k.clone(), json!({"sd": true})))
                    .collect::<Map<_, _>>()
            })
            .unwrap_or_default();

        payload["selectiveDisclosure"] = json!({
            "fields": {
                "credentialSubject": {
                    "sd": false,
                    "children": {"fields": fields}
                }
            }
        });
    }

    payload["vc"] = Value::Object(vc);
    if let Some(mapping) = mapping.filter(|m| !m.is_null()) {
        payload["mapping"] = mapping;
    }

    Ok(payload)
}

/// Ask the upstream verifier for a verification request for
/// `credential_type`. The verifier redirects the wallet to the façade's
/// callback pages once verification completes or fails.
///
/// # Errors
///
/// Returns `Error::Upstream` when the verifier rejects the request.
pub async fn request_verification(
    provider: &impl VerifierService, credential_type: &str, base_url: &str,
) -> Result<String, Error> {
    let base_url = base_url.trim_end_matches('/');
    let request = VerificationRequest {
        credential_type: credential_type.to_string(),
        success_redirect_uri: format!("{base_url}/verify/callback/success/$id"),
        error_redirect_uri: format!("{base_url}/verify/callback/error/$id"),
    };

    tracing::debug!("requesting {credential_type} verification");
    let verification_uri = VerifierService::verify(provider, &request)
        .await
        .context("requesting verification")?;
    Ok(verification_uri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CatalogIssuer;

    fn definition(format: CredentialFormat) -> CredentialDefinition {
        CredentialDefinition {
            id: "VerifiableId".to_string(),
            title: "VerifiableId".to_string(),
            issuer: CatalogIssuer {
                name: "InfoCert".to_string(),
            },
            selected_format: format,
            offer: json!({
                "@context": ["https://www.w3.org/2018/credentials/v1"],
                "id": "urn:uuid:template",
                "type": ["VerifiableCredential", "VerifiableId"],
                "credentialSubject": {
                    "familyName": "DOE",
                    "firstName": "Jane",
                    "age": 42,
                    "address": {"country": "IT"}
                }
            }),
        }
    }

    fn identity() -> IssuerIdentity {
        IssuerIdentity {
            did: "did:key:z6Mk".to_string(),
            jwk: json!({"kty": "OKP", "crv": "Ed25519"}),
        }
    }

    #[test]
    fn sd_jwt_payload() {
        let payload =
            issuance_payload(&definition(CredentialFormat::SdJwtVcdm), &identity(), None, "vc-1")
                .expect("should build payload");

        assert_eq!(payload["issuerDid"], "did:key:z6Mk");
        assert_eq!(payload["issuanceKey"]["type"], "local");
        let jwk: Value =
            serde_json::from_str(payload["issuanceKey"]["jwk"].as_str().expect("jwk string"))
                .expect("jwk should be JSON");
        assert_eq!(jwk["crv"], "Ed25519");

        assert_eq!(payload["vc"]["id"], "vc-1");
        assert_eq!(payload["vc"]["credentialSubject"]["age"], 42);

        let sd = &payload["selectiveDisclosure"]["fields"]["credentialSubject"];
        assert_eq!(sd["sd"], false);
        assert_eq!(
            sd["children"]["fields"],
            json!({"familyName": {"sd": true}, "firstName": {"sd": true}})
        );
        assert!(payload.get("mapping").is_none());
    }

    #[test]
    fn jwt_payload() {
        let mapping = json!({"id": "<uuid>"});
        let payload = issuance_payload(
            &definition(CredentialFormat::JwtVcdm),
            &identity(),
            Some(mapping.clone()),
            "vc-2",
        )
        .expect("should build payload");

        assert!(payload.get("selectiveDisclosure").is_none());
        assert_eq!(payload["mapping"], mapping);
    }

    #[test]
    fn null_mapping() {
        let payload = issuance_payload(
            &definition(CredentialFormat::JwtVcdm),
            &identity(),
            Some(Value::Null),
            "vc-3",
        )
        .unwrap();
        assert!(payload.get("mapping").is_none());
    }

    #[test]
    fn template_not_object() {
        let mut def = definition(CredentialFormat::SdJwtVcdm);
        def.offer = json!("VerifiableId");
        assert!(matches!(
            issuance_payload(&def, &identity(), None, "vc-4"),
            Err(Error::ServerError(_))
        ));
    }
}
