// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The introspector: turns a record's declared [`RawField`] table into the
//! field table the walks run against, applying the driver's annotation
//! handling, and memoizes the result per `(driver type, record type)`.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::coder::record::{EmbedShape, GetFn, GetMutFn, RawAccess, RawField, Record};
use crate::coder::{CoderPair, DecoderFn, EncoderFn, Reflect};
use crate::error::Error;
use crate::resolver::context::{DecodeState, EncodeState};
use crate::resolver::DriverHandle;

/// The introspected fields of one record type under one driver, in
/// declaration order.
pub struct FieldTable {
    name: &'static str,
    fields: Vec<FieldInfo>,
}

impl FieldTable {
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One introspected field: the declared metadata joined with the driver's
/// parsed annotation and the compiled coders.
pub(crate) struct FieldInfo {
    index: usize,
    name: &'static str,
    type_name: &'static str,
    meta: Option<Arc<dyn Any + Send + Sync>>,
    omit_empty: bool,
    access: FieldAccess,
}

pub(crate) enum FieldAccess {
    Leaf {
        get: GetFn,
        get_mut: GetMutFn,
        encoder: EncoderFn,
        decoder: DecoderFn,
    },
    Embedded {
        shape: &'static EmbedShape,
        table: Arc<FieldTable>,
    },
}

impl FieldInfo {
    #[allow(dead_code)]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn meta(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.meta.as_ref()
    }

    pub(crate) fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    pub(crate) fn access(&self) -> &FieldAccess {
        &self.access
    }
}

type TableKey = (TypeId, TypeId);

fn table_cache() -> &'static RwLock<HashMap<TableKey, Arc<FieldTable>>> {
    static CACHE: OnceLock<RwLock<HashMap<TableKey, Arc<FieldTable>>>> = OnceLock::new();
    CACHE.get_or_init(Default::default)
}

/// Returns the introspected field table for `S` under this driver, building
/// it on first use. Concurrent first builds race benignly: the first entry
/// published wins and the losers are discarded.
pub fn cached_fields<S: Record>(driver: &DriverHandle) -> Result<Arc<FieldTable>, Error> {
    let key = (driver.key(), TypeId::of::<S>());
    if let Some(found) = table_cache()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(found.clone());
    }

    let built = Arc::new(build_fields(
        driver,
        S::record_name(),
        S::record_fields(),
    )?);

    let mut map = table_cache().write().unwrap_or_else(PoisonError::into_inner);
    Ok(map.entry(key).or_insert(built).clone())
}

fn build_fields(
    driver: &DriverHandle,
    record_name: &'static str,
    raw: &'static [RawField],
) -> Result<FieldTable, Error> {
    let tag_name = driver.name();
    let mut fields = Vec::with_capacity(raw.len());

    for field in raw {
        match &field.access {
            RawAccess::Embedded(shape) => {
                let table = (shape.fields)(driver)?;
                if table.is_empty() {
                    continue;
                }
                fields.push(FieldInfo {
                    index: field.index,
                    name: field.name,
                    type_name: field.type_name,
                    meta: None,
                    omit_empty: false,
                    access: FieldAccess::Embedded {
                        shape: *shape,
                        table,
                    },
                });
            }
            RawAccess::Leaf {
                get,
                get_mut,
                coders,
            } => {
                if !field.exported {
                    continue;
                }

                let mut meta = None;
                let mut omit_empty = false;
                let annotation = field
                    .annotations
                    .iter()
                    .find(|(key, _)| *key == tag_name)
                    .map(|(_, value)| *value);

                if let Some(value) = annotation {
                    if driver.tag().skip_value(value) {
                        continue;
                    }
                    match driver.tag().parse_value(value) {
                        Ok((omit, parsed)) => {
                            omit_empty = omit;
                            meta = Some(Arc::from(parsed));
                        }
                        Err(err) => {
                            // A broken annotation poisons the field rather
                            // than the whole record walk: the error is
                            // reported whenever the field is visited, and
                            // introspection of this record stops here.
                            let pair =
                                poisoned_tag_coders(tag_name, value, record_name, field.name, &err);
                            fields.push(FieldInfo {
                                index: field.index,
                                name: field.name,
                                type_name: field.type_name,
                                meta: None,
                                omit_empty: false,
                                access: FieldAccess::Leaf {
                                    get: *get,
                                    get_mut: *get_mut,
                                    encoder: pair.encoder,
                                    decoder: pair.decoder,
                                },
                            });
                            break;
                        }
                    }
                }

                let pair = (coders)(driver)?;
                fields.push(FieldInfo {
                    index: field.index,
                    name: field.name,
                    type_name: field.type_name,
                    meta,
                    omit_empty,
                    access: FieldAccess::Leaf {
                        get: *get,
                        get_mut: *get_mut,
                        encoder: pair.encoder,
                        decoder: pair.decoder,
                    },
                });
            }
        }
    }

    Ok(FieldTable {
        name: record_name,
        fields,
    })
}

fn poisoned_tag_coders(
    tag_name: &'static str,
    value: &'static str,
    record_name: &'static str,
    field_name: &'static str,
    err: &Error,
) -> CoderPair {
    let message = format!(
        "{tag_name}: tag {value} of struct field {record_name}.{field_name}: {err}"
    );
    let encode_message = message.clone();
    CoderPair {
        encoder: Arc::new(move |s: &mut EncodeState, _: &dyn Reflect| {
            Err(s.fail(Error::invalid_tag(encode_message.clone())))
        }),
        decoder: Arc::new(move |s: &mut DecodeState, _: &mut dyn Reflect| {
            Err(s.fail(Error::invalid_tag(message.clone())))
        }),
    }
}
