pub fn get_compute_document() -> &'static str {
    r#"{
  "kind": "discovery#restDescription",
  "name": "compute",
  "version": "v1",
  "revision": "20200302",
  "title": "Compute Engine API",
  "rootUrl": "https://compute.googleapis.com/",
  "servicePath": "compute/v1/",
  "schemas": {
    "Address": {
      "id": "Address",
      "type": "object",
      "description": "Represents an IP Address resource.",
      "properties": {
        "address": {"type": "string", "description": "The static IP address represented by this resource."},
        "creationTimestamp": {"type": "string", "description": "[Output Only] Creation timestamp in RFC3339 text format."},
        "id": {"type": "string", "format": "uint64"},
        "name": {"type": "string"},
        "IPProtocol": {"type": "string", "deprecated": true},
        "labels": {"type": "object", "additionalProperties": {"type": "string"}},
        "users": {"type": "array", "items": {"type": "string"}},
        "status": {
          "type": "string",
          "enum": ["IN_USE", "RESERVED", "RESERVING"],
          "enumDescriptions": ["Address is being used.", "Address is reserved.", "Address is being reserved."]
        },
        "purpose": {"type": "string", "enum": ["GCE_ENDPOINT", "SHARED"]},
        "sharing": {"type": "string", "enum": ["NONE", "SHARED"]}
      }
    },
    "AddressList": {
      "id": "AddressList",
      "type": "object",
      "properties": {
        "items": {"type": "array", "items": {"$ref": "Address"}},
        "nextPageToken": {"type": "string"},
        "warning": {
          "type": "object",
          "properties": {
            "code": {"type": "string", "enum": ["DEPRECATED_RESOURCE_USED", "NO_RESULTS_ON_PAGE"]},
            "message": {"type": "string"}
          }
        }
      }
    },
    "Operation": {
      "id": "Operation",
      "type": "object",
      "properties": {
        "name": {"type": "string"},
        "zone": {"type": "string"},
        "status": {"type": "string", "enum": ["DONE", "PENDING", "RUNNING"]},
        "warnings": {
          "type": "array",
          "items": {
            "type": "object",
            "properties": {
              "code": {"type": "string"},
              "message": {"type": "string"}
            }
          }
        },
        "error": {
          "type": "object",
          "properties": {
            "errors": {
              "type": "array",
              "items": {
                "type": "object",
                "properties": {"code": {"type": "string"}}
              }
            }
          }
        }
      }
    }
  },
  "resources": {
    "addresses": {
      "methods": {
        "get": {
          "id": "compute.addresses.get",
          "path": "projects/{project}/regions/{region}/addresses/{address}",
          "flatPath": "projects/{project}/regions/{region}/addresses/{address}",
          "httpMethod": "GET",
          "description": "Returns the specified address resource.",
          "parameters": {
            "project": {"type": "string", "required": true, "location": "path"},
            "region": {"type": "string", "required": true, "location": "path"},
            "address": {"type": "string", "required": true, "location": "path"}
          },
          "parameterOrder": ["project", "region", "address"],
          "response": {"$ref": "Address"},
          "scopes": [
            "https://www.googleapis.com/auth/compute.readonly",
            "https://www.googleapis.com/auth/cloud-platform"
          ]
        },
        "list": {
          "id": "compute.addresses.list",
          "path": "projects/{project}/regions/{region}/addresses",
          "httpMethod": "GET",
          "description": "Retrieves a list of addresses contained within the specified region.",
          "parameters": {
            "project": {"type": "string", "required": true, "location": "path"},
            "region": {"type": "string", "required": true, "location": "path"},
            "maxResults": {"type": "integer", "format": "uint32", "location": "query", "default": "500"},
            "pageToken": {"type": "string", "location": "query"},
            "filter": {"type": "string", "location": "query"}
          },
          "parameterOrder": ["project", "region"],
          "response": {"$ref": "AddressList"},
          "scopes": ["https://www.googleapis.com/auth/cloud-platform"]
        },
        "insert": {
          "id": "compute.addresses.insert",
          "path": "projects/{project}/regions/{region}/addresses",
          "httpMethod": "POST",
          "description": "Creates an address resource in the specified project.",
          "parameters": {
            "project": {"type": "string", "required": true, "location": "path"},
            "region": {"type": "string", "required": true, "location": "path"},
            "requestId": {"type": "string", "location": "query"}
          },
          "parameterOrder": ["project", "region"],
          "request": {"$ref": "Address"},
          "response": {"$ref": "Operation"},
          "scopes": ["https://www.googleapis.com/auth/compute"]
        }
      }
    },
    "regionOperations": {
      "methods": {
        "get": {
          "id": "compute.regionOperations.get",
          "path": "projects/{project}/regions/{region}/operations/{operation}",
          "httpMethod": "GET",
          "description": "Retrieves the specified region-specific Operations resource.",
          "parameters": {
            "project": {"type": "string", "required": true, "location": "path"},
            "region": {"type": "string", "required": true, "location": "path"},
            "operation": {"type": "string", "required": true, "location": "path"}
          },
          "parameterOrder": ["project", "region", "operation"],
          "response": {"$ref": "Operation"},
          "scopes": ["https://www.googleapis.com/auth/compute.readonly"]
        }
      }
    }
  }
}"#
}

/// Nested resources with `{+name}` expansions. Lake and Zone share one inline metastore schema.
pub fn get_lakes_document() -> &'static str {
    r#"{
  "name": "dataplex",
  "version": "v1",
  "revision": "20240101",
  "rootUrl": "https://dataplex.googleapis.com/",
  "servicePath": "",
  "schemas": {
    "Lake": {
      "id": "Lake",
      "type": "object",
      "properties": {
        "name": {"type": "string"},
        "labels": {"type": "object", "additionalProperties": {"type": "string"}},
        "metastore": {
          "type": "object",
          "description": "Settings to manage the metastore of a lake.",
          "properties": {"service": {"type": "string"}}
        },
        "assetStatus": {"$ref": "AssetStatus"},
        "options": {"type": "any", "format": "google.protobuf.Struct"}
      }
    },
    "Zone": {
      "id": "Zone",
      "type": "object",
      "properties": {
        "name": {"type": "string"},
        "assetStatus": {"$ref": "AssetStatus"},
        "metastore": {
          "type": "object",
          "description": "Settings to manage the metastore of a zone.",
          "properties": {"service": {"type": "string"}}
        },
        "discoverySpec": {
          "type": "object",
          "properties": {"enabled": {"type": "boolean"}}
        }
      }
    },
    "AssetStatus": {
      "id": "AssetStatus",
      "type": "object",
      "properties": {
        "activeAssets": {"type": "integer", "format": "int32"},
        "updateTime": {"type": "string", "format": "google-datetime"}
      }
    },
    "Empty": {"id": "Empty", "type": "object", "properties": {}},
    "ListLakesResponse": {
      "id": "ListLakesResponse",
      "type": "object",
      "properties": {
        "lakes": {"type": "array", "items": {"$ref": "Lake"}},
        "nextPageToken": {"type": "string"}
      }
    }
  },
  "resources": {
    "projects": {
      "resources": {
        "locations": {
          "resources": {
            "lakes": {
              "methods": {
                "get": {
                  "id": "dataplex.projects.locations.lakes.get",
                  "path": "v1/{+name}",
                  "flatPath": "v1/projects/{projectsId}/locations/{locationsId}/lakes/{lakesId}",
                  "httpMethod": "GET",
                  "parameters": {
                    "name": {"type": "string", "required": true, "location": "path", "pattern": "^projects/[^/]+/locations/[^/]+/lakes/[^/]+$"}
                  },
                  "parameterOrder": ["name"],
                  "response": {"$ref": "Lake"},
                  "scopes": ["https://www.googleapis.com/auth/cloud-platform"]
                },
                "list": {
                  "id": "dataplex.projects.locations.lakes.list",
                  "path": "v1/{+parent}/lakes",
                  "flatPath": "v1/projects/{projectsId}/locations/{locationsId}/lakes",
                  "httpMethod": "GET",
                  "parameters": {
                    "parent": {"type": "string", "required": true, "location": "path"},
                    "pageSize": {"type": "integer", "format": "int32", "location": "query"},
                    "pageToken": {"type": "string", "location": "query"}
                  },
                  "parameterOrder": ["parent"],
                  "response": {"$ref": "ListLakesResponse"},
                  "scopes": ["https://www.googleapis.com/auth/cloud-platform"]
                },
                "delete": {
                  "id": "dataplex.projects.locations.lakes.delete",
                  "path": "v1/{+name}",
                  "flatPath": "v1/projects/{projectsId}/locations/{locationsId}/lakes/{lakesId}",
                  "httpMethod": "DELETE",
                  "parameters": {
                    "name": {"type": "string", "required": true, "location": "path"}
                  },
                  "parameterOrder": ["name"],
                  "response": {"$ref": "Empty"},
                  "scopes": ["https://www.googleapis.com/auth/cloud-platform"]
                }
              },
              "resources": {
                "zones": {
                  "methods": {
                    "get": {
                      "id": "dataplex.projects.locations.lakes.zones.get",
                      "path": "v1/{+name}",
                      "flatPath": "v1/projects/{projectsId}/locations/{locationsId}/lakes/{lakesId}/zones/{zonesId}",
                      "httpMethod": "GET",
                      "parameters": {
                        "name": {"type": "string", "required": true, "location": "path"}
                      },
                      "parameterOrder": ["name"],
                      "response": {"$ref": "Zone"},
                      "scopes": ["https://www.googleapis.com/auth/cloud-platform"]
                    }
                  }
                }
              }
            }
          }
        }
      }
    }
  }
}"#
}

/// A configuration with a location the lakes document doesn't have.
pub fn get_stale_lakes_config() -> &'static str {
    r#"{
  "converterVersion": "0.1.0",
  "apiVersion": "v1",
  "discoveryRevision": "20231201",
  "inlineSchemas": [
    {
      "schema": "{\"properties\":{\"retired\":{\"type\":\"boolean\"}},\"type\":\"object\"}",
      "locations": {"Retirement": ["schemas.Lake.retirement"]}
    }
  ]
}"#
}

/// Two methods of one resource that disagree on the api version.
pub fn get_inconsistent_versions_document() -> &'static str {
    r#"{
  "name": "mixed",
  "version": "v1",
  "rootUrl": "https://mixed.googleapis.com/",
  "servicePath": "",
  "schemas": {
    "Item": {"id": "Item", "type": "object", "properties": {"name": {"type": "string"}}}
  },
  "resources": {
    "items": {
      "methods": {
        "get": {
          "id": "mixed.items.get",
          "path": "v1/items/{item}",
          "httpMethod": "GET",
          "parameters": {"item": {"type": "string", "required": true, "location": "path"}},
          "parameterOrder": ["item"],
          "response": {"$ref": "Item"},
          "apiVersion": "2024-01-01"
        },
        "delete": {
          "id": "mixed.items.delete",
          "path": "v1/items/{item}",
          "httpMethod": "DELETE",
          "parameters": {"item": {"type": "string", "required": true, "location": "path"}},
          "parameterOrder": ["item"],
          "response": {"$ref": "Item"}
        }
      }
    }
  }
}"#
}

/// An untyped `any` property without a well known format.
pub fn get_untyped_any_document() -> &'static str {
    r#"{
  "name": "untyped",
  "version": "v1",
  "schemas": {
    "Thing": {"id": "Thing", "type": "object", "properties": {"payload": {"type": "any"}}}
  }
}"#
}

pub fn get_description_property_document() -> &'static str {
    r#"{
  "name": "lakes",
  "version": "v1",
  "schemas": {
    "Lake": {
      "id": "Lake",
      "type": "object",
      "properties": {
        "info": {"type": "object", "properties": {"size": {"type": "string"}}}
      }
    },
    "Zone": {
      "id": "Zone",
      "type": "object",
      "properties": {
        "details": {
          "type": "object",
          "properties": {
            "size": {"type": "string"},
            "description": {"type": "string", "description": "Free form text."}
          }
        }
      }
    }
  }
}"#
}

pub fn get_colliding_names_document() -> &'static str {
    r#"{
  "name": "lakes",
  "version": "v1",
  "schemas": {
    "Lake": {"id": "Lake", "type": "object", "properties": {"name": {"type": "string"}}},
    "lake": {"id": "lake", "type": "object", "properties": {"size": {"type": "string"}}}
  }
}"#
}

pub fn get_nested_errors_document() -> &'static str {
    r#"{
  "name": "compute",
  "version": "v1",
  "schemas": {
    "Operation": {
      "id": "Operation",
      "type": "object",
      "properties": {
        "errors": {
          "type": "object",
          "properties": {
            "errors": {
              "type": "object",
              "properties": {"code": {"type": "string"}}
            }
          }
        }
      }
    }
  }
}"#
}
