// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Success envelope and pagination descriptors shared by all API routes.
//!
//! Failures use the same envelope shape; see `AppError`'s `IntoResponse`.

use serde::Serialize;

use crate::models::NutritionLog;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// `{ success: true, data?, count?, pagination?, message?, nutritionLog? }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Parent log returned alongside meal sub-operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_log: Option<NutritionLog>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            pagination: None,
            message: None,
            nutrition_log: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_pagination(mut self, count: usize, pagination: Pagination) -> Self {
        self.count = Some(count);
        self.pagination = Some(pagination);
        self
    }

    pub fn with_log(mut self, log: NutritionLog) -> Self {
        self.nutrition_log = Some(log);
        self
    }
}

impl ApiResponse<()> {
    /// Envelope with no `data`, e.g. for deletes.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            pagination: None,
            message: Some(message.into()),
            nutrition_log: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct PageLink {
    pub page: u32,
    pub limit: u32,
}

/// Offset pagination descriptor.
///
/// `next` and `prev` are present only when such a page exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
    pub total: usize,
    pub pages: usize,
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    /// Describe page `page` (1-indexed) of `limit` items out of `total`.
    ///
    /// `limit` must be non-zero.
    pub fn new(page: u32, limit: u32, total: usize) -> Self {
        let start = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let end = (page as usize).saturating_mul(limit as usize);

        Self {
            next: (end < total).then_some(PageLink {
                page: page.saturating_add(1),
                limit,
            }),
            prev: (start > 0).then_some(PageLink {
                page: page - 1,
                limit,
            }),
            total,
            pages: total.div_ceil(limit as usize),
            page,
            limit,
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}
