//! PaymentProofWorkflow - upload a transfer receipt, then commit escrow
//!
//! Two physically separate operations presented as one logical action:
//!
//! 1. Store the image in the blob bucket under `{order_id}_{timestamp}.{ext}`
//!    and obtain its durable URL.
//! 2. Drive the `accepted -> paid_escrow` edge, setting
//!    `payment_proof_url` in the same store update.
//!
//! If (1) fails the order is untouched and the whole attach is retried.
//! If (2) fails the blob is orphaned: the error carries the uploaded URL
//! and the caller retries [`commit_proof`](PaymentProofWorkflow::commit_proof)
//! with it instead of re-uploading. Success here is the only path that
//! makes `payment_proof_url` non-null.

use crate::config::Config;
use crate::lifecycle::OrderStateMachine;
use crate::store::{BlobStore, OrderStore};
use chrono::Utc;
use image::ImageFormat;
use shared::{CoreError, CoreResult, Order, OrderStatus, Role};
use std::sync::Arc;

/// Receipt for a completed blob upload, sufficient to (re)try the commit.
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub order_id: String,
    pub url: String,
}

pub struct PaymentProofWorkflow<S, B> {
    store: Arc<S>,
    blobs: Arc<B>,
    machine: OrderStateMachine<S>,
    bucket: String,
}

impl<S: OrderStore, B: BlobStore> PaymentProofWorkflow<S, B> {
    pub fn new(store: Arc<S>, blobs: Arc<B>, config: &Config) -> Self {
        Self {
            machine: OrderStateMachine::new(store.clone()),
            store,
            blobs,
            bucket: config.proof_bucket.clone(),
        }
    }

    /// Upload `image` as payment proof for `order_id` and move the order
    /// into escrow. Preconditions: the order is `accepted` and `actor_id`
    /// is its buyer.
    pub async fn attach_proof(
        &self,
        order_id: &str,
        actor_id: &str,
        image: &[u8],
    ) -> CoreResult<Order> {
        let upload = self.upload_proof(order_id, actor_id, image).await?;
        self.commit_proof(&upload, actor_id)
            .await
            .map_err(|source| CoreError::UploadOrphan {
                proof_url: upload.url,
                source: Box::new(source),
            })
    }

    /// Step 1: validate preconditions and store the image. No order
    /// mutation happens here; on failure the caller simply retries.
    pub async fn upload_proof(
        &self,
        order_id: &str,
        actor_id: &str,
        image: &[u8],
    ) -> CoreResult<ProofUpload> {
        let order = self.store.get_order(order_id).await?;
        if order.status != OrderStatus::Accepted {
            return Err(CoreError::InvalidTransition {
                from: order.status,
                to: OrderStatus::PaidEscrow,
            });
        }
        if Role::of(&order, actor_id) != Some(Role::Buyer) {
            return Err(CoreError::Unauthorized(
                "only the buyer may upload payment proof".to_string(),
            ));
        }

        let format = image::guess_format(image)
            .map_err(|_| CoreError::Validation("unrecognized image format".to_string()))?;
        let ext = proof_extension(format);
        let key = format!("{}_{}.{}", order_id, Utc::now().timestamp_millis(), ext);

        self.blobs
            .put(&self.bucket, &key, image, format.to_mime_type())
            .await
            .map_err(|e| CoreError::Upload(e.to_string()))?;
        let url = self.blobs.public_url(&self.bucket, &key);
        tracing::info!(order_id, key = %key, "Payment proof uploaded");

        Ok(ProofUpload {
            order_id: order_id.to_string(),
            url,
        })
    }

    /// Step 2: the `accepted -> paid_escrow` edge, with the proof URL in
    /// the same update. Safe to retry with an existing [`ProofUpload`].
    pub async fn commit_proof(&self, upload: &ProofUpload, actor_id: &str) -> CoreResult<Order> {
        self.machine
            .apply(
                &upload.order_id,
                OrderStatus::PaidEscrow,
                actor_id,
                Some(upload.url.clone()),
            )
            .await
    }
}

/// Blob key extension for a sniffed image format. Unknown raster formats
/// fall back to jpg, matching what phone galleries hand over.
fn proof_extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::WebP => "webp",
        _ => "jpg",
    }
}
